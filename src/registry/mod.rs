//! Company-registry lookups.
//!
//! - [`status`] — folds free-text registry statuses into [`RegistryStatus`].
//! - [`opencorporates`] — typed HTTP client for the OpenCorporates search API.
//!
//! [`RegistryClient::search`] is the only entry point callers need. It never
//! fails: an empty query, a transport error, or a non-success response all
//! produce [`RegistryRecord::no_match`].

pub mod opencorporates;
pub mod status;

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::RegistryConfig;
use crate::models::{RegistryRecord, RegistryStatus};
use status::normalize_status;

/// Failures on the live registry path. Never leaves this module.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("registry returned HTTP {0}")]
    Status(u16),
}

#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    use_mock: bool,
}

impl RegistryClient {
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::with_http(http, config))
    }

    /// Build a client around an existing `reqwest::Client` (shared connection pool).
    pub fn with_http(http: Client, config: &RegistryConfig) -> Self {
        RegistryClient {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            use_mock: config.use_mock,
        }
    }

    /// Look up `query` and return the best registry match, or a no-match record.
    pub async fn search(&self, query: &str) -> RegistryRecord {
        if query.is_empty() {
            warn!("registry lookup skipped: no query provided");
            return RegistryRecord::no_match();
        }

        if self.use_mock {
            info!(query, "registry lookup using mock response");
            return mock_record();
        }

        info!(query, "registry lookup against live API");
        let result = opencorporates::fetch_best_match(
            &self.http,
            &self.base_url,
            self.api_key.as_deref(),
            query,
        )
        .await;

        match result {
            Ok(Some(company)) => RegistryRecord::hit(
                company.company_number,
                company.jurisdiction_code,
                normalize_status(company.current_status.as_deref()),
                company.incorporation_date,
            ),
            Ok(None) => {
                warn!(query, "registry returned no results");
                RegistryRecord::no_match()
            }
            Err(e) => {
                error!(query, error = %e, "registry lookup failed, falling back to no match");
                RegistryRecord::no_match()
            }
        }
    }
}

/// Fixed "happy path" record served when the mock switch is on.
fn mock_record() -> RegistryRecord {
    RegistryRecord::hit(
        Some("08003277".to_string()),
        Some("gb".to_string()),
        RegistryStatus::Active,
        Some("2012-03-21".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String, use_mock: bool) -> RegistryConfig {
        RegistryConfig {
            base_url,
            api_key: None,
            use_mock,
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_empty_query_is_no_match() {
        let client = RegistryClient::new(&config("http://127.0.0.1:9".into(), true)).unwrap();
        assert_eq!(client.search("").await, RegistryRecord::no_match());
    }

    #[tokio::test]
    async fn test_mock_returns_fixed_record() {
        let client = RegistryClient::new(&config("http://127.0.0.1:9".into(), true)).unwrap();
        let record = client.search("Acme Ltd").await;
        assert!(record.matched);
        assert_eq!(record.company_number.as_deref(), Some("08003277"));
        assert_eq!(record.jurisdiction.as_deref(), Some("gb"));
        assert_eq!(record.status, Some(RegistryStatus::Active));
        assert_eq!(record.incorporation_date.as_deref(), Some("2012-03-21"));
    }

    #[tokio::test]
    async fn test_live_hit_is_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/companies/search"))
            .and(query_param("q", "Acme Ltd"))
            .and(query_param("per_page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": {"companies": [{"company": {
                    "company_number": "01234567",
                    "jurisdiction_code": "gb",
                    "current_status": "In Liquidation",
                    "incorporation_date": "2001-05-04"
                }}]},
                "total_count": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RegistryClient::new(&config(server.uri(), false)).unwrap();
        let record = client.search("Acme Ltd").await;

        assert!(record.matched);
        assert_eq!(record.company_number.as_deref(), Some("01234567"));
        assert_eq!(record.status, Some(RegistryStatus::Inactive));
        assert_eq!(record.incorporation_date.as_deref(), Some("2001-05-04"));
    }

    #[tokio::test]
    async fn test_api_key_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/companies/search"))
            .and(query_param("api_token", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": {"companies": [{"company": {"current_status": "Active"}}]},
                "total_count": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut cfg = config(server.uri(), false);
        cfg.api_key = Some("secret".into());
        let record = RegistryClient::new(&cfg).unwrap().search("Acme").await;
        assert_eq!(record.status, Some(RegistryStatus::Active));
    }

    #[tokio::test]
    async fn test_server_error_is_no_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/companies/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = RegistryClient::new(&config(server.uri(), false)).unwrap();
        assert_eq!(client.search("Acme Ltd").await, RegistryRecord::no_match());
    }

    #[tokio::test]
    async fn test_undecodable_body_is_no_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/companies/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = RegistryClient::new(&config(server.uri(), false)).unwrap();
        assert_eq!(client.search("Acme Ltd").await, RegistryRecord::no_match());
    }

    #[tokio::test]
    async fn test_empty_results_is_no_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/companies/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": {"companies": []},
                "total_count": 0
            })))
            .mount(&server)
            .await;

        let client = RegistryClient::new(&config(server.uri(), false)).unwrap();
        assert_eq!(client.search("Nobody Inc").await, RegistryRecord::no_match());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_no_match() {
        // Port 9 (discard) is not listening in test environments.
        let client = RegistryClient::new(&config("http://127.0.0.1:9".into(), false)).unwrap();
        assert_eq!(client.search("Acme Ltd").await, RegistryRecord::no_match());
    }
}
