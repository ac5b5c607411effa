//! Input validation for API requests.
//!
//! Format-level checks for identifiers, emails, dates and monetary amounts.
//! For collecting multiple validation errors and returning them as an
//! ApiError, use the `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Pragmatic email shape check: local@domain.tld
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9][-a-zA-Z0-9]*(\.[a-zA-Z0-9][-a-zA-Z0-9]*)+$"
    ).unwrap();

    /// Calendar date in YYYY-MM-DD form (range-checked separately via chrono)
    static ref DATE_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a person or position name
pub fn validate_name(name: &str, field_name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{} is required", field_name));
    }

    if name.len() > 100 {
        return Err(format!("{} is too long (max 100 characters)", field_name));
    }

    Ok(())
}

/// Validate a YYYY-MM-DD calendar date
pub fn validate_date(date: &str, field_name: &str) -> Result<(), String> {
    if date.is_empty() {
        return Err(format!("{} is required", field_name));
    }

    if !DATE_REGEX.is_match(date) {
        return Err(format!("{} must be a YYYY-MM-DD date", field_name));
    }

    if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(format!("{} is not a valid calendar date", field_name));
    }

    Ok(())
}

/// Validate a monetary amount (non-negative, finite)
pub fn validate_amount(amount: f64, field_name: &str) -> Result<(), String> {
    if !amount.is_finite() {
        return Err(format!("{} must be a number", field_name));
    }

    if amount < 0.0 {
        return Err(format!("{} cannot be negative", field_name));
    }

    Ok(())
}

/// Validate a worked-hours figure for a single entry
pub fn validate_hours(hours: f64) -> Result<(), String> {
    if !hours.is_finite() {
        return Err("Hours must be a number".to_string());
    }

    if hours <= 0.0 || hours > 24.0 {
        return Err("Hours must be greater than 0 and at most 24".to_string());
    }

    Ok(())
}

/// Validate a UUID string
pub fn validate_uuid(id: &str, field_name: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err(format!("{} is required", field_name));
    }

    if uuid::Uuid::parse_str(id).is_err() {
        return Err(format!("Invalid {} format", field_name));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ama.owusu@example.com").is_ok());
        assert!(validate_email("hr+payroll@company.co.uk").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ama", "first_name").is_ok());
        assert!(validate_name("Senior Engineer", "position").is_ok());

        assert!(validate_name("", "first_name").is_err());
        assert!(validate_name("   ", "first_name").is_err());
        assert!(validate_name(&"x".repeat(101), "first_name").is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15", "joining_date").is_ok());
        assert!(validate_date("2024-02-29", "joining_date").is_ok()); // leap year

        assert!(validate_date("", "joining_date").is_err());
        assert!(validate_date("15-01-2024", "joining_date").is_err());
        assert!(validate_date("2024-13-01", "joining_date").is_err());
        assert!(validate_date("2023-02-29", "joining_date").is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(0.0, "annual_ctc").is_ok());
        assert!(validate_amount(60000.0, "annual_ctc").is_ok());

        assert!(validate_amount(-1.0, "annual_ctc").is_err());
        assert!(validate_amount(f64::NAN, "annual_ctc").is_err());
        assert!(validate_amount(f64::INFINITY, "annual_ctc").is_err());
    }

    #[test]
    fn test_validate_hours() {
        assert!(validate_hours(8.0).is_ok());
        assert!(validate_hours(0.5).is_ok());
        assert!(validate_hours(24.0).is_ok());

        assert!(validate_hours(0.0).is_err());
        assert!(validate_hours(-2.0).is_err());
        assert!(validate_hours(25.0).is_err());
        assert!(validate_hours(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000", "employee_id").is_ok());
        assert!(validate_uuid("", "employee_id").is_err());
        assert!(validate_uuid("not-a-uuid", "employee_id").is_err());
    }
}
