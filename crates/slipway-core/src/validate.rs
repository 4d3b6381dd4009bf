//! Operator input validation.

use crate::error::DeployError;

/// Minimum digit count for a contact number (country code included).
pub const MIN_CONTACT_DIGITS: usize = 10;

/// Validate an operator contact number: digits only, at least
/// [`MIN_CONTACT_DIGITS`] of them. Returns the trimmed number.
pub fn validate_contact_number(input: &str) -> Result<String, DeployError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(DeployError::Validation(format!(
            "contact number must contain digits only, got '{trimmed}'"
        )));
    }
    if trimmed.len() < MIN_CONTACT_DIGITS {
        return Err(DeployError::Validation(format!(
            "contact number too short (minimum {MIN_CONTACT_DIGITS} digits)"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate an application name. The platform enforces its own naming rules;
/// locally we only require a non-empty name before using it in commands.
pub fn validate_app_name(name: &str) -> Result<(), DeployError> {
    if name.trim().is_empty() {
        return Err(DeployError::Validation(
            "application name must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_number() {
        assert_eq!(
            validate_contact_number("5215512345678").unwrap(),
            "5215512345678"
        );
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(
            validate_contact_number("  5215512345678\n").unwrap(),
            "5215512345678"
        );
    }

    #[test]
    fn test_rejects_non_digits() {
        assert!(validate_contact_number("abc123").is_err());
        assert!(validate_contact_number("+5215512345678").is_err());
        assert!(validate_contact_number("52 1551 234 5678").is_err());
    }

    #[test]
    fn test_rejects_short_number() {
        assert!(validate_contact_number("123456789").is_err());
    }

    #[test]
    fn test_accepts_exactly_minimum_digits() {
        assert!(validate_contact_number("1234567890").is_ok());
    }

    #[test]
    fn test_rejects_empty_number() {
        assert!(validate_contact_number("").is_err());
        assert!(validate_contact_number("   ").is_err());
    }

    #[test]
    fn test_app_name_must_not_be_empty() {
        assert!(validate_app_name("").is_err());
        assert!(validate_app_name("  ").is_err());
        assert!(validate_app_name("alert-relay-bot").is_ok());
    }
}
