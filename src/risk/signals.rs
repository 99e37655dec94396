use chrono::NaiveDate;

use crate::models::{RegistryRecord, RegistryStatus, SanctionsRecord, SignalSet};
use crate::risk::age::company_age_years;

/// Derive the scoring signals from the two verification results.
///
/// An absent record behaves like a no-match record.
pub fn normalize_signals(
    registry: Option<&RegistryRecord>,
    sanctions: Option<&SanctionsRecord>,
    today: NaiveDate,
) -> SignalSet {
    let (registry_match, status, incorporation_date) = match registry {
        Some(r) => (r.matched, r.status, r.incorporation_date.as_deref()),
        None => (false, None, None),
    };

    let company_age = company_age_years(incorporation_date, today);

    SignalSet {
        registry_match,
        is_active: status == Some(RegistryStatus::Active),
        age_gte_3: company_age >= 3,
        sanctions_match: sanctions.is_some_and(|s| s.matched),
        // No address or bank-history sources are wired in yet.
        address_mismatch: false,
        first_time_bank: false,
        company_age_actual: company_age,
    }
}
