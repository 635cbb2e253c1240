use chrono::{DateTime, NaiveDate, Utc};

/// UTC calendar day of a timestamp. Daily check-in uniqueness is keyed on
/// this, so "one check-in per day" means one per UTC day.
pub fn utc_day(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}

/// Stable `YYYY-MM-DD` key for a timestamp's UTC day.
pub fn day_key(at: DateTime<Utc>) -> String {
    utc_day(at).format("%Y-%m-%d").to_string()
}

pub fn same_utc_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    utc_day(a) == utc_day(b)
}
