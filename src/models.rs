use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Closed set of registry statuses that free-text registry data is folded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryStatus {
    Active,
    Inactive,
    Dissolved,
    Unknown,
    Other,
}

impl std::fmt::Display for RegistryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryStatus::Active => write!(f, "active"),
            RegistryStatus::Inactive => write!(f, "inactive"),
            RegistryStatus::Dissolved => write!(f, "dissolved"),
            RegistryStatus::Unknown => write!(f, "unknown"),
            RegistryStatus::Other => write!(f, "other"),
        }
    }
}

impl FromStr for RegistryStatus {
    type Err = ();

    /// Parse one of the five canonical labels (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(RegistryStatus::Active),
            "inactive" => Ok(RegistryStatus::Inactive),
            "dissolved" => Ok(RegistryStatus::Dissolved),
            "unknown" => Ok(RegistryStatus::Unknown),
            "other" => Ok(RegistryStatus::Other),
            _ => Err(()),
        }
    }
}

/// Result of a company-registry lookup.
///
/// When `matched` is false every other field is `None`. Use
/// [`RegistryRecord::no_match`] and [`RegistryRecord::hit`] to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    #[serde(rename = "match")]
    pub matched: bool,
    pub company_number: Option<String>,
    pub jurisdiction: Option<String>,
    pub status: Option<RegistryStatus>,
    /// `YYYY-MM-DD`, as reported by the registry.
    pub incorporation_date: Option<String>,
}

impl RegistryRecord {
    pub fn no_match() -> Self {
        RegistryRecord {
            matched: false,
            company_number: None,
            jurisdiction: None,
            status: None,
            incorporation_date: None,
        }
    }

    pub fn hit(
        company_number: Option<String>,
        jurisdiction: Option<String>,
        status: RegistryStatus,
        incorporation_date: Option<String>,
    ) -> Self {
        RegistryRecord {
            matched: true,
            company_number,
            jurisdiction,
            status: Some(status),
            incorporation_date,
        }
    }
}

impl Default for RegistryRecord {
    fn default() -> Self {
        Self::no_match()
    }
}

// ---------------------------------------------------------------------------
// Sanctions
// ---------------------------------------------------------------------------

/// Result of screening one name against the sanctions reference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanctionsRecord {
    #[serde(rename = "match")]
    pub matched: bool,
    /// Title-cased reference name; present only when `matched`.
    pub matched_name: Option<String>,
    /// Best similarity observed, 0-100. Reported even without a match.
    pub score: u8,
}

impl SanctionsRecord {
    pub fn no_match() -> Self {
        SanctionsRecord {
            matched: false,
            matched_name: None,
            score: 0,
        }
    }
}

impl Default for SanctionsRecord {
    fn default() -> Self {
        Self::no_match()
    }
}

// ---------------------------------------------------------------------------
// Raw verification payloads
// ---------------------------------------------------------------------------

/// Loosely shaped registry section of a verification bundle.
///
/// Every field is optional and read on its own: a mistyped field becomes `None`
/// without discarding its neighbours. Conversion into [`RegistryRecord`] is total.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryPayload {
    #[serde(default, rename = "match", deserialize_with = "flag")]
    pub matched: Option<bool>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub company_number: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub jurisdiction: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub incorporation_date: Option<String>,
}

impl From<RegistryPayload> for RegistryRecord {
    fn from(raw: RegistryPayload) -> Self {
        if !raw.matched.unwrap_or(false) {
            return RegistryRecord::no_match();
        }

        // Canonical labels pass straight through; anything else is registry free text.
        let status = match raw.status.as_deref() {
            Some(s) => s
                .parse::<RegistryStatus>()
                .unwrap_or_else(|_| crate::registry::status::normalize_status(Some(s))),
            None => RegistryStatus::Unknown,
        };

        RegistryRecord::hit(
            raw.company_number,
            raw.jurisdiction,
            status,
            raw.incorporation_date,
        )
    }
}

/// Loosely shaped sanctions section of a verification bundle.
///
/// The `match` flag is read independently of `matched_name` and `score`, so a
/// hit is never lost to a mistyped sibling field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SanctionsPayload {
    #[serde(default, rename = "match", deserialize_with = "flag")]
    pub matched: Option<bool>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub matched_name: Option<String>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub score: Option<f64>,
}

impl From<SanctionsPayload> for SanctionsRecord {
    fn from(raw: SanctionsPayload) -> Self {
        let matched = raw.matched.unwrap_or(false);
        SanctionsRecord {
            matched,
            matched_name: if matched { raw.matched_name } else { None },
            score: raw.score.unwrap_or(0.0).round().clamp(0.0, 100.0) as u8,
        }
    }
}

/// The verification results a caller hands to the risk engine.
///
/// Either section may be absent; an absent section scores as "no match".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationBundle {
    pub registry: Option<RegistryRecord>,
    pub sanctions: Option<SanctionsRecord>,
}

impl VerificationBundle {
    /// Build a bundle from an arbitrary JSON document.
    ///
    /// Accepts either `{"verifications": {"registry": .., "sanctions": ..}}` or the
    /// inner object directly. A section that is not an object is dropped with a
    /// warning. Inside a section each field degrades on its own.
    pub fn from_value(value: &Value) -> Self {
        let root = value.get("verifications").unwrap_or(value);

        let registry = root
            .get("registry")
            .and_then(|v| section::<RegistryPayload>("registry", v))
            .map(RegistryRecord::from);
        let sanctions = root
            .get("sanctions")
            .and_then(|v| section::<SanctionsPayload>("sanctions", v))
            .map(SanctionsRecord::from);

        VerificationBundle { registry, sanctions }
    }
}

fn section<T: DeserializeOwned>(name: &str, value: &Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    // Field deserializers are lenient, so only the section's own shape can fail here.
    if !value.is_object() {
        tracing::warn!(section = name, value = %value, "verification section is not an object, treating as no match");
        return None;
    }
    match T::deserialize(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(section = name, error = %e, "malformed verification section, treating as no match");
            None
        }
    }
}

fn mistyped(expected: &'static str, value: &Value) {
    tracing::warn!(expected, value = %value, "ignoring mistyped verification field");
}

/// Any JSON value; keeps it when it has the shape of `T`, otherwise `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match T::deserialize(&v) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            mistyped(std::any::type_name::<T>(), &v);
            None
        }
    }))
}

/// `true`/`false`, also accepted as the strings `"true"`/`"false"`.
fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None => None,
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Some(true),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Some(false),
        Some(other) => {
            mistyped("bool", &other);
            None
        }
    })
}

/// Strings as-is, numbers in their decimal form.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => {
            mistyped("string or number", &other);
            None
        }
    })
}

/// Numbers as-is, numeric strings parsed.
fn number_or_text<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n),
            _ => {
                mistyped("number", &Value::String(s));
                None
            }
        },
        Some(other) => {
            mistyped("number", &other);
            None
        }
    })
}

// ---------------------------------------------------------------------------
// Signals and results
// ---------------------------------------------------------------------------

/// Normalized risk signals derived from one registry and one sanctions record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SignalSet {
    pub registry_match: bool,
    pub is_active: bool,
    pub age_gte_3: bool,
    pub sanctions_match: bool,
    /// Reserved; always false.
    pub address_mismatch: bool,
    /// Reserved; always false.
    pub first_time_bank: bool,
    pub company_age_actual: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLabel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLabel::Low => write!(f, "low"),
            RiskLabel::Medium => write!(f, "medium"),
            RiskLabel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskResult {
    pub score: u8,
    pub label: RiskLabel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_match_serializes_with_match_key() {
        let v = serde_json::to_value(RegistryRecord::no_match()).unwrap();
        assert_eq!(
            v,
            json!({
                "match": false,
                "company_number": null,
                "jurisdiction": null,
                "status": null,
                "incorporation_date": null
            })
        );
    }

    #[test]
    fn test_unmatched_payload_drops_fields() {
        let raw = RegistryPayload {
            matched: Some(false),
            company_number: Some("123".into()),
            jurisdiction: Some("gb".into()),
            status: Some("active".into()),
            incorporation_date: Some("2001-01-01".into()),
        };
        assert_eq!(RegistryRecord::from(raw), RegistryRecord::no_match());
    }

    #[test]
    fn test_payload_status_accepts_labels_and_free_text() {
        let mk = |s: &str| RegistryPayload {
            matched: Some(true),
            status: Some(s.to_string()),
            ..Default::default()
        };
        assert_eq!(RegistryRecord::from(mk("active")).status, Some(RegistryStatus::Active));
        assert_eq!(RegistryRecord::from(mk("unknown")).status, Some(RegistryStatus::Unknown));
        assert_eq!(
            RegistryRecord::from(mk("In Liquidation")).status,
            Some(RegistryStatus::Inactive)
        );
        assert_eq!(
            RegistryRecord::from(mk("Struck off")).status,
            Some(RegistryStatus::Other)
        );
    }

    #[test]
    fn test_sanctions_payload_hides_name_without_match() {
        let raw = SanctionsPayload {
            matched: Some(false),
            matched_name: Some("Someone".into()),
            score: Some(140.0),
        };
        let rec = SanctionsRecord::from(raw);
        assert!(!rec.matched);
        assert_eq!(rec.matched_name, None);
        assert_eq!(rec.score, 100);
    }

    #[test]
    fn test_bundle_from_agent_state() {
        let state = json!({
            "verifications": {
                "registry": {"match": true, "status": "active", "incorporation_date": "2012-03-21"},
                "sanctions": {"match": false, "matched_name": null, "score": 40}
            }
        });
        let bundle = VerificationBundle::from_value(&state);
        let registry = bundle.registry.unwrap();
        assert!(registry.matched);
        assert_eq!(registry.status, Some(RegistryStatus::Active));
        assert_eq!(bundle.sanctions.unwrap().score, 40);
    }

    #[test]
    fn test_bundle_malformed_sections_are_no_match() {
        let state = json!({
            "registry": {"match": "yes please"},
            "sanctions": [1, 2, 3]
        });
        let bundle = VerificationBundle::from_value(&state);
        assert_eq!(bundle.registry, Some(RegistryRecord::no_match()));
        assert_eq!(bundle.sanctions, None);
    }

    #[test]
    fn test_sanctions_hit_survives_mistyped_score() {
        let state = json!({
            "sanctions": {"match": true, "matched_name": "Vladimir Putin", "score": "95"}
        });
        let rec = VerificationBundle::from_value(&state).sanctions.unwrap();
        assert!(rec.matched);
        assert_eq!(rec.matched_name.as_deref(), Some("Vladimir Putin"));
        assert_eq!(rec.score, 95);

        let state = json!({"sanctions": {"match": true, "matched_name": 7, "score": {"x": 1}}});
        let rec = VerificationBundle::from_value(&state).sanctions.unwrap();
        assert!(rec.matched);
        assert_eq!(rec.matched_name.as_deref(), Some("7"));
        assert_eq!(rec.score, 0);
    }

    #[test]
    fn test_registry_numeric_company_number() {
        let state = json!({
            "registry": {
                "match": true,
                "company_number": 8003277,
                "status": "active",
                "incorporation_date": "2012-03-21"
            }
        });
        let rec = VerificationBundle::from_value(&state).registry.unwrap();
        assert!(rec.matched);
        assert_eq!(rec.company_number.as_deref(), Some("8003277"));
        assert_eq!(rec.status, Some(RegistryStatus::Active));
    }

    #[test]
    fn test_registry_hit_survives_mistyped_field() {
        let state = json!({
            "registry": {
                "match": true,
                "jurisdiction": ["gb"],
                "status": 42,
                "incorporation_date": "2012-03-21"
            }
        });
        let rec = VerificationBundle::from_value(&state).registry.unwrap();
        assert!(rec.matched);
        assert_eq!(rec.jurisdiction, None);
        assert_eq!(rec.status, Some(RegistryStatus::Unknown));
        assert_eq!(rec.incorporation_date.as_deref(), Some("2012-03-21"));
    }

    #[test]
    fn test_match_flag_accepts_string_booleans() {
        let state = json!({"sanctions": {"match": "TRUE"}, "registry": {"match": "false"}});
        let bundle = VerificationBundle::from_value(&state);
        assert!(bundle.sanctions.unwrap().matched);
        assert!(!bundle.registry.unwrap().matched);
    }

    #[test]
    fn test_bundle_missing_sections() {
        let bundle = VerificationBundle::from_value(&json!({}));
        assert!(bundle.registry.is_none());
        assert!(bundle.sanctions.is_none());
    }
}
