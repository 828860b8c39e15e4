//! Calendar helpers shared by the generator, the expander and the planner.
//!
//! Plan dates are civil dates without a time zone. Day offsets are always
//! relative to the planting date.

use jiff::{civil::Date, ToSpan};

use crate::error::{PlannerError, Result};

/// Earliest year accepted for planting and harvest dates.
pub const MIN_YEAR: i16 = 1900;

/// Latest year accepted for planting and harvest dates.
pub const MAX_YEAR: i16 = 2200;

/// Largest day offset a rule may carry (roughly ten years).
pub const MAX_DAY_OFFSET: u32 = 3660;

/// Adds a (possibly negative) number of days, saturating at the calendar
/// bounds.
pub fn add_days(date: Date, days: i64) -> Date {
    let days = days.clamp(-i64::from(MAX_DAY_OFFSET) * 4, i64::from(MAX_DAY_OFFSET) * 4);
    date.saturating_add(days.days())
}

/// Number of days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: Date, to: Date) -> i64 {
    i64::from((to - from).get_days())
}

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`) supplied for `field`.
pub fn parse_iso_date(field: &str, value: &str) -> Result<Date> {
    let date: Date = value.trim().parse().map_err(|e| {
        PlannerError::invalid_input(field).with_reason(format!(
            "'{value}' is not a valid calendar date (expected YYYY-MM-DD): {e}"
        ))
    })?;
    ensure_supported_year(field, date)?;
    Ok(date)
}

/// Rejects dates outside the supported year range.
pub fn ensure_supported_year(field: &str, date: Date) -> Result<()> {
    if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        Ok(())
    } else {
        Err(PlannerError::invalid_input(field).with_reason(format!(
            "{date} is outside the supported range {MIN_YEAR}..={MAX_YEAR}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_add_days_crosses_months() {
        assert_eq!(add_days(date(2024, 6, 1), 120), date(2024, 9, 29));
        assert_eq!(add_days(date(2024, 3, 1), -1), date(2024, 2, 29));
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(date(2024, 6, 1), date(2024, 6, 15)), 14);
        assert_eq!(days_between(date(2024, 6, 15), date(2024, 6, 1)), -14);
        assert_eq!(days_between(date(2024, 6, 1), date(2024, 6, 1)), 0);
    }

    #[test]
    fn test_parse_iso_date_rejects_impossible_dates() {
        assert!(parse_iso_date("planting_date", "2024-02-30").is_err());
        assert!(parse_iso_date("planting_date", "June 1st").is_err());
        assert!(parse_iso_date("planting_date", "1850-06-01").is_err());
        assert_eq!(
            parse_iso_date("planting_date", " 2024-06-01 ").unwrap(),
            date(2024, 6, 1)
        );
    }
}
