use reqwest::Client;
use serde::{Deserialize, Deserializer};

use super::RegistryError;

/// `GET /companies/search` response. Only the fields we read are modeled.
#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<SearchResults>,
    #[serde(default)]
    total_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResults {
    #[serde(default)]
    companies: Vec<CompanyEntry>,
}

#[derive(Debug, Deserialize)]
struct CompanyEntry {
    company: Company,
}

/// A single company as reported by OpenCorporates.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Company {
    /// Some jurisdictions publish purely numeric identifiers.
    #[serde(default, deserialize_with = "string_or_number")]
    pub company_number: Option<String>,
    #[serde(default)]
    pub jurisdiction_code: Option<String>,
    #[serde(default)]
    pub current_status: Option<String>,
    #[serde(default)]
    pub incorporation_date: Option<String>,
}

/// Search OpenCorporates and return the best (first) company, if any.
///
/// Returns `Ok(None)` when the search produced no results and `Err` for transport
/// failures, non-success statuses, or an undecodable body.
pub async fn fetch_best_match(
    client: &Client,
    base_url: &str,
    api_key: Option<&str>,
    query: &str,
) -> Result<Option<Company>, RegistryError> {
    let url = format!("{}/companies/search", base_url.trim_end_matches('/'));

    let mut params: Vec<(&str, &str)> = vec![("q", query), ("per_page", "1")];
    if let Some(key) = api_key {
        params.push(("api_token", key));
    }

    let response = client
        .get(&url)
        .query(&params)
        .header("User-Agent", "kyb-risk/0.1.0")
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(RegistryError::Status(status.as_u16()));
    }

    let data: SearchResponse = response.json().await?;
    Ok(best_company(data))
}

fn best_company(data: SearchResponse) -> Option<Company> {
    // An absent count is treated the same as zero.
    if data.total_count.unwrap_or(0) == 0 {
        return None;
    }
    data.results?
        .companies
        .into_iter()
        .next()
        .map(|entry| entry.company)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Option<Company> {
        best_company(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_first_company_is_best() {
        let company = parse(json!({
            "results": {
                "companies": [
                    {"company": {
                        "company_number": "08003277",
                        "jurisdiction_code": "gb",
                        "current_status": "Active",
                        "incorporation_date": "2012-03-21"
                    }},
                    {"company": {"company_number": "99999999"}}
                ]
            },
            "total_count": 2
        }))
        .unwrap();

        assert_eq!(company.company_number.as_deref(), Some("08003277"));
        assert_eq!(company.jurisdiction_code.as_deref(), Some("gb"));
        assert_eq!(company.current_status.as_deref(), Some("Active"));
        assert_eq!(company.incorporation_date.as_deref(), Some("2012-03-21"));
    }

    #[test]
    fn test_numeric_company_number_is_stringified() {
        let company = parse(json!({
            "results": {"companies": [{"company": {"company_number": 4521}}]},
            "total_count": 1
        }))
        .unwrap();
        assert_eq!(company.company_number.as_deref(), Some("4521"));
        assert_eq!(company.current_status, None);
    }

    #[test]
    fn test_zero_total_count_is_no_match() {
        assert_eq!(
            parse(json!({
                "results": {"companies": [{"company": {"company_number": "1"}}]},
                "total_count": 0
            })),
            None
        );
    }

    #[test]
    fn test_missing_results_is_no_match() {
        assert_eq!(parse(json!({})), None);
        assert_eq!(
            parse(json!({"results": {"companies": []}, "total_count": 3})),
            None
        );
        // A company without a total count is still no match.
        assert_eq!(
            parse(json!({"results": {"companies": [{"company": {"company_number": "1"}}]}})),
            None
        );
    }
}
