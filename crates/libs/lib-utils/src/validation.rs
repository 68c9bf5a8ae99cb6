//! # Validation Utilities
//!
//! Checks run on form input before a request leaves the client.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} is required", field_name))
    } else {
        Ok(())
    }
}

/// Basic email shape check.
pub fn validate_email(email: &str) -> Result<(), String> {
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err("Invalid email format".to_string()),
    }
}

/// Validate minimum length in characters.
pub fn validate_min_length(value: &str, min: usize, field_name: &str) -> Result<(), String> {
    if value.chars().count() < min {
        Err(format!("{} must be at least {} characters", field_name, min))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty() {
        assert_eq!(validate_not_empty("  ", "Email"), Err("Email is required".to_string()));
        assert!(validate_not_empty("x", "Email").is_ok());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("asha@example.com").is_ok());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("asha@localhost").is_err());
        assert!(validate_email("asha").is_err());
    }

    #[test]
    fn test_min_length() {
        assert!(validate_min_length("secret", 6, "Password").is_ok());
        assert_eq!(
            validate_min_length("abc", 6, "Password"),
            Err("Password must be at least 6 characters".to_string())
        );
    }
}
