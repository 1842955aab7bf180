//! Single-field validation checks
//!
//! Each input type (registration, persona, usuario) composes these checks into
//! its own `validate` function that reports every rejected field at once.
use crate::error::ValidationError;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Lazy-loaded email validation regex
///
/// This regex validates email addresses according to a practical subset of RFC 5322.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("Invalid email regex pattern")
});

/// Date format accepted by the public registration endpoint (`dd/mm/yyyy`)
pub const REGISTRO_DATE_FORMAT: &str = "%d/%m/%Y";

/// Date format accepted by the administrative persona endpoints (`yyyy-mm-dd`)
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Minimum password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length, in characters
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validates an email address
///
/// # Examples
///
/// ```rust
/// use clinica_core::validation::validate_email;
///
/// assert!(validate_email("ana@example.com").is_ok());
/// assert!(validate_email("invalid-email").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::MissingField(
            "Email is required".to_string(),
        ));
    }

    if email.len() > 254 {
        return Err(ValidationError::InvalidEmail(
            "Email is too long".to_string(),
        ));
    }

    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(format!(
            "Invalid email format: {email}"
        )))
    }
}

/// Validates a password according to security requirements
///
/// # Password Requirements
///
/// - Minimum 8 characters
/// - Maximum 128 characters
/// - Cannot be empty or whitespace only
///
/// # Examples
///
/// ```rust
/// use clinica_core::validation::validate_password;
///
/// assert!(validate_password("securepassword123").is_ok());
/// assert!(validate_password("weak").is_err());
/// ```
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::MissingField(
            "Password is required".to_string(),
        ));
    }

    if password.trim().is_empty() {
        return Err(ValidationError::InvalidPassword(
            "Password cannot be only whitespace".to_string(),
        ));
    }

    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "Password must be no more than {MAX_PASSWORD_LENGTH} characters long"
        )));
    }

    Ok(())
}

/// Validates a required name-like field (first name, surnames)
///
/// # Examples
///
/// ```rust
/// use clinica_core::validation::validate_required_name;
///
/// assert!(validate_required_name("José María").is_ok());
/// assert!(validate_required_name("   ").is_err());
/// ```
pub fn validate_required_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingField(
            "Value is required".to_string(),
        ));
    }

    if name.chars().count() > 100 {
        return Err(ValidationError::InvalidName(
            "Name must be no more than 100 characters long".to_string(),
        ));
    }

    Ok(())
}

/// Validates an optional free-text field such as a phone number or address
pub fn validate_optional_text(value: Option<&str>, max_len: usize) -> Result<(), ValidationError> {
    if let Some(value) = value {
        if value.chars().count() > max_len {
            return Err(ValidationError::InvalidField(format!(
                "Value must be no more than {max_len} characters long"
            )));
        }
    }

    Ok(())
}

/// Parses a date using the given `chrono` format string
///
/// # Examples
///
/// ```rust
/// use clinica_core::validation::{parse_date, REGISTRO_DATE_FORMAT};
///
/// assert!(parse_date("15/03/1990", REGISTRO_DATE_FORMAT).is_ok());
/// assert!(parse_date("1990-03-15", REGISTRO_DATE_FORMAT).is_err());
/// ```
pub fn parse_date(value: &str, format: &str) -> Result<NaiveDate, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(
            "Date is required".to_string(),
        ));
    }

    NaiveDate::parse_from_str(value.trim(), format).map_err(|_| {
        let expected = match format {
            REGISTRO_DATE_FORMAT => "dd/mm/aaaa",
            ISO_DATE_FORMAT => "aaaa-mm-dd",
            other => other,
        };
        ValidationError::InvalidDate(format!("{value} (expected {expected})"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("test.email+tag@domain.co.uk").is_ok());
        assert!(validate_email("user123@test-domain.com").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("").is_err());
        assert!(validate_email("invalid-email").is_err());
        assert!(validate_email("@domain.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());

        let long_email = format!("{}@example.com", "a".repeat(250));
        assert!(validate_email(&long_email).is_err());
    }

    #[test]
    fn test_validate_password_valid() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("12345678").is_ok()); // Minimum length
    }

    #[test]
    fn test_validate_password_invalid() {
        assert!(matches!(
            validate_password(""),
            Err(ValidationError::MissingField(_))
        ));
        assert!(validate_password("        ").is_err()); // Whitespace only
        assert!(validate_password("short").is_err());
        assert!(validate_password("1234567").is_err());
        assert!(validate_password(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_password_counts_characters() {
        // 2 bytes per character
        assert!(validate_password(&"ñ".repeat(70)).is_ok());
        assert!(validate_password(&"ñ".repeat(128)).is_ok());
        assert!(validate_password(&"ñ".repeat(129)).is_err());
        assert!(validate_password(&"é".repeat(7)).is_err());
    }

    #[test]
    fn test_validate_required_name() {
        assert!(validate_required_name("Ana").is_ok());
        assert!(validate_required_name("García-López").is_ok());
        assert!(validate_required_name("").is_err());
        assert!(validate_required_name(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_optional_text() {
        assert!(validate_optional_text(None, 10).is_ok());
        assert!(validate_optional_text(Some("5551234"), 10).is_ok());
        assert!(validate_optional_text(Some("12345678901"), 10).is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let date = parse_date("15/03/1990", REGISTRO_DATE_FORMAT).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1990, 3, 15).unwrap());

        let date = parse_date("1990-03-15", ISO_DATE_FORMAT).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1990, 3, 15).unwrap());

        assert!(parse_date("31/02/1990", REGISTRO_DATE_FORMAT).is_err());
        assert!(parse_date("03/15/1990", REGISTRO_DATE_FORMAT).is_err());
        assert!(matches!(
            parse_date("", ISO_DATE_FORMAT),
            Err(ValidationError::MissingField(_))
        ));
    }
}
