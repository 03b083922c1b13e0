//! Pre-flight argument validation.
//!
//! Every check runs before any network activity and reports the first
//! violation as [`ClientError::Validation`] with the offending field named.

use time::macros::format_description;
use time::Date;

use crate::error::ClientError;

/// Moving-average lookback periods the service computes.
pub const MA_PERIODS: [u32; 5] = [10, 20, 50, 100, 200];

/// Validate a `YYYY-MM-DD` date string.
///
/// The value must be shaped as four digits, dash, two digits, dash, two
/// digits, and must name a real calendar date ("2025-13-40" fails even
/// though it matches the shape).
pub fn ensure_date(field: &'static str, value: &str) -> Result<(), ClientError> {
    if !is_date_shaped(value) {
        return Err(ClientError::validation(
            field,
            format!("invalid date format: {value}. Expected YYYY-MM-DD"),
        ));
    }

    let format = format_description!("[year]-[month]-[day]");
    if Date::parse(value, &format).is_err() {
        return Err(ClientError::validation(
            field,
            format!("not a real calendar date: {value}"),
        ));
    }

    Ok(())
}

fn is_date_shaped(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    bytes
        .iter()
        .enumerate()
        .all(|(index, byte)| matches!(index, 4 | 7) || byte.is_ascii_digit())
}

/// Validate that an integer parameter falls within inclusive bounds.
pub fn ensure_in_range(
    field: &'static str,
    value: u32,
    min: u32,
    max: u32,
) -> Result<(), ClientError> {
    if value < min || value > max {
        return Err(ClientError::validation(
            field,
            format!("invalid {field}: {value}. Must be between {min} and {max}"),
        ));
    }
    Ok(())
}

/// Validate that a float parameter falls within inclusive bounds.
pub fn ensure_in_range_f64(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ClientError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ClientError::validation(
            field,
            format!("invalid {field}: {value}. Must be between {min} and {max}"),
        ));
    }
    Ok(())
}

/// Validate a moving-average period selector.
pub fn ensure_ma_period(field: &'static str, value: u32) -> Result<(), ClientError> {
    if !MA_PERIODS.contains(&value) {
        let allowed = MA_PERIODS.map(|p| p.to_string()).join(", ");
        return Err(ClientError::validation(
            field,
            format!("invalid {field}: {value}. Must be one of: {allowed}"),
        ));
    }
    Ok(())
}

/// Validate that a required string parameter is present and non-empty.
pub fn ensure_present(field: &'static str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::validation(
            field,
            format!("{field} parameter is required"),
        ));
    }
    Ok(())
}
