//! Calendar date checks for `date_parseable`.

use chrono::NaiveDate;
use idef_model::DateFormat;

/// Years below this are rejected as ambiguous two-digit-era values.
pub const MIN_YEAR: i32 = 100;

/// Parse `value` under the first format that yields a real calendar date.
///
/// Components must round-trip exactly, so `2024/02/30` is rejected rather
/// than rolled over into March. Years `0000` to `0099` never parse.
pub fn parse_date(value: &str, formats: &[DateFormat]) -> Option<NaiveDate> {
    if value.trim().is_empty() {
        return None;
    }
    formats.iter().find_map(|format| {
        let parts = format.extract(value).filter(|parts| parts.year >= MIN_YEAR)?;
        NaiveDate::from_ymd_opt(parts.year, parts.month, parts.day)
    })
}

pub fn is_parseable(value: &str, formats: &[DateFormat]) -> bool {
    parse_date(value, formats).is_some()
}
