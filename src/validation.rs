// Library Desk - Library Management Core
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Input validation for the presentation boundary
//!
//! Form values arrive as strings. They are checked here before any store is
//! called, and failures are reported as validation errors rather than
//! persistence errors.

use crate::error::{LibraryError, Result};
use chrono::NaiveDate;

/// Date format accepted by the reports
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Trimmed value of a required field
pub fn require_field<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LibraryError::MissingRequiredField(field.to_string()));
    }
    Ok(trimmed)
}

/// Parse a positive numeric identifier
pub fn parse_id(field: &str, value: &str) -> Result<i64> {
    let raw = require_field(field, value)?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(LibraryError::invalid_input(format!(
            "Invalid {}: '{}'",
            field, raw
        ))),
    }
}

/// Parse a `YYYY-MM-DD` report date
pub fn parse_report_date(value: &str) -> Result<NaiveDate> {
    let raw = value.trim();
    NaiveDate::parse_from_str(raw, REPORT_DATE_FORMAT)
        .map_err(|_| LibraryError::InvalidDate(raw.to_string()))
}

/// Parse a report date range; the start may not come after the end
pub fn parse_report_range(from: &str, to: &str) -> Result<(NaiveDate, NaiveDate)> {
    let start = parse_report_date(from)?;
    let end = parse_report_date(to)?;
    if end < start {
        return Err(LibraryError::invalid_input(format!(
            "Start date {} is after end date {}",
            start, end
        )));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_require_field() {
        assert_eq!(require_field("title", "  Dune ").unwrap(), "Dune");
        assert!(matches!(
            require_field("title", "   "),
            Err(LibraryError::MissingRequiredField(f)) if f == "title"
        ));
    }

    #[rstest]
    #[case("1", Some(1))]
    #[case(" 42 ", Some(42))]
    #[case("0", None)]
    #[case("-3", None)]
    #[case("abc", None)]
    #[case("4.5", None)]
    fn test_parse_id(#[case] input: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_id("Book ID", input).ok(), expected);
    }

    #[test]
    fn test_parse_id_blank_is_missing() {
        assert!(matches!(parse_id("Book ID", ""), Err(LibraryError::MissingRequiredField(_))));
    }

    #[rstest]
    #[case("2025-01-31", true)]
    #[case("2024-02-29", true)]
    #[case("2025-02-29", false)]
    #[case("2025-13-01", false)]
    #[case("31/01/2025", false)]
    #[case("", false)]
    fn test_parse_report_date(#[case] input: &str, #[case] valid: bool) {
        let parsed = parse_report_date(input);
        assert_eq!(parsed.is_ok(), valid);
        if !valid {
            assert!(parsed.unwrap_err().is_validation_error());
        }
    }

    #[test]
    fn test_parse_report_range() {
        let (start, end) = parse_report_range("2025-01-02", "2025-01-02").unwrap();
        assert_eq!(start, end);

        assert!(matches!(
            parse_report_range("2025-01-05", "2025-01-02"),
            Err(LibraryError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_report_range("2025-01-05", "tomorrow"),
            Err(LibraryError::InvalidDate(_))
        ));
    }
}
