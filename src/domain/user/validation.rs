//! User field validation rules

use thiserror::Error;

/// Validation errors for user fields
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserValidationError {
    #[error("Username must be between 3 and 50 characters")]
    UsernameLength,

    #[error("Username can only contain letters, numbers, and underscores")]
    UsernameCharacters,

    #[error("Email is required")]
    EmailEmpty,

    #[error("Email cannot exceed 100 characters")]
    EmailTooLong,

    #[error("Invalid email format")]
    EmailFormat,

    #[error("Password must be between 8 and 100 characters")]
    PasswordLength,
}

/// Validate a username: 3-50 characters, alphanumeric + underscore.
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    let len = username.chars().count();
    if !(3..=50).contains(&len) {
        return Err(UserValidationError::UsernameLength);
    }

    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(UserValidationError::UsernameCharacters);
    }

    Ok(())
}

/// Validate an email address shape: one `@` with non-empty local part and
/// a domain containing a dot, at most 100 characters.
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmailEmpty);
    }

    if email.chars().count() > 100 {
        return Err(UserValidationError::EmailTooLong);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(UserValidationError::EmailFormat);
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(UserValidationError::EmailFormat);
    }

    if email.chars().any(char::is_whitespace) {
        return Err(UserValidationError::EmailFormat);
    }

    Ok(())
}

/// Validate a plaintext password before hashing: 8-100 characters.
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    let len = password.chars().count();
    if !(8..=100).contains(&len) {
        return Err(UserValidationError::PasswordLength);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("user_42").is_ok());
    }

    #[test]
    fn test_username_length() {
        assert_eq!(
            validate_username("ab"),
            Err(UserValidationError::UsernameLength)
        );
        assert_eq!(
            validate_username(&"a".repeat(51)),
            Err(UserValidationError::UsernameLength)
        );
    }

    #[test]
    fn test_username_characters() {
        assert_eq!(
            validate_username("user name"),
            Err(UserValidationError::UsernameCharacters)
        );
        assert_eq!(
            validate_username("user-name"),
            Err(UserValidationError::UsernameCharacters)
        );
    }

    #[test]
    fn test_valid_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("a.b@sub.example.org").is_ok());
    }

    #[test]
    fn test_invalid_email() {
        assert_eq!(validate_email(""), Err(UserValidationError::EmailEmpty));
        assert_eq!(
            validate_email("no-at-sign"),
            Err(UserValidationError::EmailFormat)
        );
        assert_eq!(
            validate_email("@example.com"),
            Err(UserValidationError::EmailFormat)
        );
        assert_eq!(
            validate_email("alice@nodot"),
            Err(UserValidationError::EmailFormat)
        );
        assert_eq!(
            validate_email(&format!("{}@example.com", "a".repeat(100))),
            Err(UserValidationError::EmailTooLong)
        );
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("longenough").is_ok());
        assert_eq!(
            validate_password("short"),
            Err(UserValidationError::PasswordLength)
        );
        assert_eq!(
            validate_password(&"p".repeat(101)),
            Err(UserValidationError::PasswordLength)
        );
    }
}
