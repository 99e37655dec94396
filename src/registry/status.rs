use crate::models::RegistryStatus;

/// Fold a free-text registry status into one of the five [`RegistryStatus`] values.
///
/// Matching is an exact, case-insensitive comparison against fixed synonym sets.
/// Missing or empty input is [`RegistryStatus::Unknown`]; any other unrecognised
/// text is [`RegistryStatus::Other`].
pub fn normalize_status(raw: Option<&str>) -> RegistryStatus {
    let status = match raw {
        Some(s) if !s.is_empty() => s.to_lowercase(),
        _ => return RegistryStatus::Unknown,
    };

    match status.as_str() {
        "active" | "company is active" => RegistryStatus::Active,

        "inactive" | "in liquidation" => RegistryStatus::Inactive,

        "dissolved" | "converted to another form" | "closed" => RegistryStatus::Dissolved,

        _ => RegistryStatus::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_empty_is_unknown() {
        assert_eq!(normalize_status(None), RegistryStatus::Unknown);
        assert_eq!(normalize_status(Some("")), RegistryStatus::Unknown);
    }

    #[test]
    fn test_active_synonyms() {
        assert_eq!(normalize_status(Some("Active")), RegistryStatus::Active);
        assert_eq!(normalize_status(Some("COMPANY IS ACTIVE")), RegistryStatus::Active);
    }

    #[test]
    fn test_inactive_synonyms() {
        assert_eq!(normalize_status(Some("inactive")), RegistryStatus::Inactive);
        assert_eq!(normalize_status(Some("In Liquidation")), RegistryStatus::Inactive);
    }

    #[test]
    fn test_dissolved_synonyms() {
        assert_eq!(normalize_status(Some("Dissolved")), RegistryStatus::Dissolved);
        assert_eq!(
            normalize_status(Some("Converted to another form")),
            RegistryStatus::Dissolved
        );
        assert_eq!(normalize_status(Some("CLOSED")), RegistryStatus::Dissolved);
    }

    #[test]
    fn test_unrecognised_is_other() {
        assert_eq!(normalize_status(Some("Struck Off")), RegistryStatus::Other);
        assert_eq!(normalize_status(Some("unknown")), RegistryStatus::Other);
        // Membership is exact, not substring or trimmed.
        assert_eq!(normalize_status(Some(" active")), RegistryStatus::Other);
        assert_eq!(normalize_status(Some("active - proposal to strike off")), RegistryStatus::Other);
        assert_eq!(normalize_status(Some("   ")), RegistryStatus::Other);
    }
}
