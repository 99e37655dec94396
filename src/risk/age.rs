use chrono::{Local, NaiveDate};
use tracing::warn;

/// Average Gregorian year length used to turn elapsed days into years.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Today's date on the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole years between `incorporation_date` (`YYYY-MM-DD`) and `today`.
///
/// Computed as floor(elapsed days / 365.25). A missing or
/// unparsable date yields 0 and, if unparsable, a warning. Future dates are not
/// clamped: they produce negative ages.
pub fn company_age_years(incorporation_date: Option<&str>, today: NaiveDate) -> i64 {
    let raw = match incorporation_date {
        Some(s) if !s.is_empty() => s,
        _ => return 0,
    };

    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => {
            let days = (today - date).num_days();
            (days as f64 / DAYS_PER_YEAR).floor() as i64
        }
        Err(e) => {
            warn!(incorporation_date = raw, error = %e, "could not parse incorporation date");
            0
        }
    }
}
