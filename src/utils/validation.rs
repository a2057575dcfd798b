//! Input validation utilities
//!
//! Custom validators plugged into `#[validate(custom(...))]` on request DTOs.

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::constants;

fn one_of(value: &str, allowed: &[&str], code: &'static str) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new(code))
    }
}

/// Validate user role
pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    one_of(role, constants::roles::ALL, "invalid_role")
}

pub fn validate_car_status(status: &str) -> Result<(), ValidationError> {
    one_of(status, constants::car_status::ALL, "invalid_car_status")
}

pub fn validate_car_owner(owner: &str) -> Result<(), ValidationError> {
    one_of(owner, constants::car_owner::ALL, "invalid_car_owner")
}

pub fn validate_complaint_status(status: &str) -> Result<(), ValidationError> {
    one_of(status, constants::complaint_status::ALL, "invalid_complaint_status")
}

/// Whether `value`, rounded to cents, fits the money columns
pub fn fits_money_column(value: &Decimal) -> bool {
    value.round_dp(2).abs() <= Decimal::new(constants::MAX_MONEY_CENTS, 2)
}

pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    if fits_money_column(value) {
        Ok(())
    } else {
        Err(ValidationError::new("amount_out_of_range"))
    }
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Make an uploaded file name safe to use as a path component
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_column_bounds() {
        assert!(fits_money_column(&Decimal::new(9_999_999_999, 2)));
        assert!(fits_money_column(&Decimal::new(-9_999_999_999, 2)));
        assert!(!fits_money_column(&Decimal::new(100_000_000_000, 0)));
        assert!(!fits_money_column(&Decimal::new(99_999_999_995, 3)));
        assert!(validate_amount(&Decimal::new(100_000_000, 0)).is_err());
        assert!(validate_amount(&Decimal::new(1250, 2)).is_ok());
    }

    #[test]
    fn test_validate_role() {
        assert!(validate_role("leader").is_ok());
        assert!(validate_role("owner").is_ok());
        assert!(validate_role("root").is_err());
    }

    #[test]
    fn test_validate_enums() {
        assert!(validate_car_status("in_repair").is_ok());
        assert!(validate_car_status("broken").is_err());
        assert!(validate_car_owner("parent_company").is_ok());
        assert!(validate_complaint_status("resolved").is_ok());
        assert!(validate_complaint_status("RESOLVED").is_err());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\invoice 1.pdf"), "invoice_1.pdf");
        assert_eq!(sanitize_file_name("..."), "file");
        assert_eq!(sanitize_file_name("photo.JPG"), "photo.JPG");
    }

    #[test]
    fn test_sanitize_string() {
        assert_eq!(sanitize_string("  Berlin\u{0007} "), "Berlin");
    }
}
