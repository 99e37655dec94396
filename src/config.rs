use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::sanctions::DEFAULT_MATCH_THRESHOLD;

/// Root configuration structure, deserialized from `.kyb-risk/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Company-registry lookup settings.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Sanctions reference list settings.
    #[serde(default)]
    pub sanctions: SanctionsConfig,
}

/// How to reach the company registry.
#[derive(Clone, Deserialize)]
pub struct RegistryConfig {
    /// OpenCorporates API root. Defaults to `https://api.opencorporates.com/v0.4`.
    #[serde(default = "default_registry_base_url")]
    pub base_url: String,
    /// Optional API token, sent as `api_token`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Serve a fixed record instead of calling the API.
    #[serde(default)]
    pub use_mock: bool,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("use_mock", &self.use_mock)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            base_url: default_registry_base_url(),
            api_key: None,
            use_mock: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where the sanctions list lives and how strict matching is.
#[derive(Debug, Clone, Deserialize)]
pub struct SanctionsConfig {
    /// CSV file with a `name` column.
    #[serde(default = "default_sanctions_path")]
    pub path: PathBuf,
    /// Minimum rounded similarity (0-100) that counts as a hit.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: u8,
}

impl Default for SanctionsConfig {
    fn default() -> Self {
        SanctionsConfig {
            path: default_sanctions_path(),
            match_threshold: default_match_threshold(),
        }
    }
}

fn default_registry_base_url() -> String {
    "https://api.opencorporates.com/v0.4".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_sanctions_path() -> PathBuf {
    PathBuf::from("data/sanctions.csv")
}

fn default_match_threshold() -> u8 {
    DEFAULT_MATCH_THRESHOLD
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `./.kyb-risk/config.toml`
/// 3. `~/.config/kyb-risk/config.toml`
/// 4. Built-in [`Config::default`]
///
/// Environment overrides are applied on top of whichever source was used.
pub fn load_config(working_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    let mut config = read_config_file(working_dir, config_override)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn read_config_file(working_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return parse_file(path);
    }

    let local_config = working_dir.join(".kyb-risk").join("config.toml");
    if local_config.exists() {
        return parse_file(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("kyb-risk").join("config.toml");
        if home_config.exists() {
            return parse_file(&home_config);
        }
    }

    Ok(Config::default())
}

fn parse_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config file {}", path.display()))
}

/// Apply `OPENCORP_BASE`, `OPENCORP_API_KEY`, `USE_REGISTRY_MOCK` and `SANCTIONS_FILE`.
///
/// `lookup` is `std::env::var` in production; tests pass a closure over a map.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base) = lookup("OPENCORP_BASE") {
        config.registry.base_url = base;
    }
    if let Some(key) = lookup("OPENCORP_API_KEY") {
        config.registry.api_key = Some(key);
    }
    if let Some(flag) = lookup("USE_REGISTRY_MOCK") {
        config.registry.use_mock = flag.eq_ignore_ascii_case("true");
    }
    if let Some(path) = lookup("SANCTIONS_FILE") {
        config.sanctions.path = PathBuf::from(path);
    }
}
