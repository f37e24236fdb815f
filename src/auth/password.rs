use bcrypt::{hash, verify, DEFAULT_COST};
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password must be at least 8 characters long")]
    TooShort,
    #[error("Password must be no more than 128 characters long")]
    TooLong,
    #[error("Password must contain at least one letter")]
    NoLetter,
    #[error("Password must contain at least one number")]
    NoNumber,
    #[error("Failed to hash password")]
    HashingFailed,
    #[error("Failed to verify password")]
    VerificationFailed,
}

const MIN_LENGTH: usize = 8;
const MAX_LENGTH: usize = 128;

/// Validate password strength
pub fn validate_password_strength(password: &str) -> Result<(), PasswordError> {
    if password.len() < MIN_LENGTH {
        return Err(PasswordError::TooShort);
    }

    if password.len() > MAX_LENGTH {
        return Err(PasswordError::TooLong);
    }

    let has_letter = Regex::new(r"[a-zA-Z]").unwrap();
    if !has_letter.is_match(password) {
        return Err(PasswordError::NoLetter);
    }

    if !password.chars().any(|c| c.is_numeric()) {
        return Err(PasswordError::NoNumber);
    }

    Ok(())
}

/// Hash a password with bcrypt
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password_strength(password)?;
    hash(password, DEFAULT_COST).map_err(|_| PasswordError::HashingFailed)
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PasswordError> {
    verify(password, password_hash).map_err(|_| PasswordError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_password_strength_validation() {
        assert!(validate_password_strength("training2024").is_ok());
        assert!(validate_password_strength("Squat315x5").is_ok());

        assert_matches!(
            validate_password_strength("abc1"),
            Err(PasswordError::TooShort)
        );
        assert_matches!(
            validate_password_strength("password"),
            Err(PasswordError::NoNumber)
        );
        assert_matches!(
            validate_password_strength("12345678"),
            Err(PasswordError::NoLetter)
        );
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("deadlift123").unwrap();

        assert!(verify_password("deadlift123", &hash).unwrap());
        assert!(!verify_password("deadlift124", &hash).unwrap());
    }
}
