use std::sync::OnceLock;

use regex::Regex;

use super::entity::User;
use crate::domain::{DomainError, DomainResult};

pub const MAX_DISPLAY_NAME_LEN: usize = 50;
pub const MAX_BIO_LEN: usize = 500;

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]{3,20}$").unwrap())
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

/// Validates all User invariants
pub fn validate_user(user: &User) -> DomainResult<()> {
    validate_username(&user.username)?;
    if let Some(name) = &user.display_name {
        validate_display_name(name)?;
    }
    validate_bio(&user.bio)?;
    Ok(())
}

/// Handles are 3-20 characters of letters, digits, and underscores
pub fn validate_username(username: &str) -> DomainResult<()> {
    if !username_regex().is_match(username) {
        return Err(DomainError::InvariantViolation(format!(
            "Username '{}' must be 3-20 letters, digits, or underscores",
            username
        )));
    }
    Ok(())
}

/// Display names cannot be blank and are capped in length
pub fn validate_display_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Display name cannot be blank".to_string(),
        ));
    }
    if name.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(DomainError::InvariantViolation(format!(
            "Display name exceeds {} characters",
            MAX_DISPLAY_NAME_LEN
        )));
    }
    Ok(())
}

/// Bios are capped in length
pub fn validate_bio(bio: &str) -> DomainResult<()> {
    if bio.chars().count() > MAX_BIO_LEN {
        return Err(DomainError::InvariantViolation(format!(
            "Bio exceeds {} characters",
            MAX_BIO_LEN
        )));
    }
    Ok(())
}

/// Shape check for sign-in identifiers
pub fn validate_email(email: &str) -> DomainResult<()> {
    if !email_regex().is_match(email) {
        return Err(DomainError::InvariantViolation(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(username: &str) -> User {
        User {
            id: 1,
            username: username.to_string(),
            display_name: None,
            bio: String::new(),
            avatar_url: None,
            story_count: 0,
            follower_count: 0,
            following_count: 0,
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_user() {
        assert!(validate_user(&user("night_owl42")).is_ok());
    }

    #[test]
    fn test_short_username_fails() {
        assert!(validate_user(&user("ab")).is_err());
    }

    #[test]
    fn test_username_with_spaces_fails() {
        assert!(validate_user(&user("night owl")).is_err());
    }

    #[test]
    fn test_overlong_bio_fails() {
        let mut u = user("night_owl42");
        u.bio = "x".repeat(MAX_BIO_LEN + 1);
        assert!(validate_user(&u).is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(validate_email("reader@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
    }
}
