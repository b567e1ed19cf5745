use crate::utils::AppError;
use chrono::{Datelike, NaiveDate};
use std::borrow::Cow;
use validator::ValidationError;

/// Splits a `YYYY-MM` string into year and month.
pub fn parse_year_month(value: &str) -> Option<(i32, u32)> {
    let (year, month) = value.split_once('-')?;

    if year.len() != 4 || month.len() != 2 {
        return None;
    }

    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;

    if !(1..=12).contains(&month) || year < 1900 {
        return None;
    }

    Some((year, month))
}

/// Like [`parse_year_month`] but fails with a client error.
pub fn require_year_month(value: &str) -> Result<(i32, u32), AppError> {
    parse_year_month(value).ok_or_else(|| {
        AppError::BadRequest(format!("Invalid year_month '{value}', expected YYYY-MM"))
    })
}

pub fn year_month_of(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn months_of_year(year: i32) -> Vec<String> {
    (1..=12).map(|month| format!("{year:04}-{month:02}")).collect()
}

pub fn validate_year_month(value: &str) -> Result<(), ValidationError> {
    match parse_year_month(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("year_month")
            .with_message(Cow::Borrowed("year_month must use the YYYY-MM format"))),
    }
}

/// Share of `part` in `whole` as a percentage rounded to two decimals.
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        return 0.0;
    }

    round2(part as f64 / whole as f64 * 100.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_year_months() {
        assert_eq!(parse_year_month("2025-01"), Some((2025, 1)));
        assert_eq!(parse_year_month("2024-12"), Some((2024, 12)));
    }

    #[test]
    fn rejects_malformed_year_months() {
        for value in ["2025-13", "2025-00", "2025-1", "25-01", "2025/01", "", "abcd-ef"] {
            assert_eq!(parse_year_month(value), None, "{value} should be rejected");
        }
    }

    #[test]
    fn derives_year_month_from_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(year_month_of(date), "2025-03");
    }

    #[test]
    fn percentage_handles_zero_and_rounding() {
        assert_eq!(percentage(50, 0), 0.0);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(3_000_000, 10_000_000), 30.0);
    }

    #[test]
    fn lists_twelve_months() {
        let months = months_of_year(2025);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], "2025-01");
        assert_eq!(months[11], "2025-12");
    }
}
