//! Account field validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::DomainError;

pub const MIN_FULLNAME_CHARS: usize = 3;
pub const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 6..=20;

pub const PASSWORD_RULE: &str = "password should be 6 to 20 characters long with a numeric, 1 lowercase and 1 uppercase letter";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("email pattern is valid")
});

pub fn validate_fullname(fullname: &str) -> Result<(), DomainError> {
    if fullname.trim().chars().count() < MIN_FULLNAME_CHARS {
        return Err(DomainError::validation(
            "fullname should be at least 3 characters long",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.is_empty() {
        return Err(DomainError::validation("email is required"));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(DomainError::validation("email is invalid"));
    }
    Ok(())
}

/// 6 to 20 characters with at least one digit, one lowercase and one
/// uppercase ASCII letter.
pub fn validate_password(password: &str) -> Result<(), DomainError> {
    let len_ok = PASSWORD_LEN.contains(&password.chars().count());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());

    if len_ok && has_digit && has_lower && has_upper {
        Ok(())
    } else {
        Err(DomainError::validation(PASSWORD_RULE))
    }
}
