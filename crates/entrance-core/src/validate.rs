//! Pure input checks for student contact details.

use crate::error::ValidationError;

/// Minimum number of digits a phone number must contain.
pub const MIN_PHONE_DIGITS: usize = 7;

/// True iff `s` has exactly one `@` with something before it, and a `.`
/// after the `@` that is followed by at least one character.
pub fn validate_email(s: &str) -> bool {
    let mut parts = s.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rfind('.') {
        Some(dot) => dot + 1 < domain.len(),
        None => false,
    }
}

/// True iff `s` only uses digits, spaces, `-`, `+`, `(` and `)`, and holds
/// at least [`MIN_PHONE_DIGITS`] digits.
pub fn validate_phone(s: &str) -> bool {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')');
    s.chars().all(allowed) && s.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
}

/// True iff `s` is non-empty and made of ASCII decimal digits only.
pub fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

pub fn check_email(s: &str) -> Result<(), ValidationError> {
    if validate_email(s) {
        Ok(())
    } else {
        Err(ValidationError::Email(s.to_string()))
    }
}

pub fn check_phone(s: &str) -> Result<(), ValidationError> {
    if validate_phone(s) {
        Ok(())
    } else {
        Err(ValidationError::Phone(s.to_string()))
    }
}

/// Fails if `s` needs more than `max` bytes on disk.
pub fn check_width(field: &'static str, s: &str, max: usize) -> Result<(), ValidationError> {
    if s.len() > max {
        Err(ValidationError::TooLong {
            field,
            len: s.len(),
            max,
        })
    } else {
        Ok(())
    }
}

/// Parse a student id typed by a user.
pub fn parse_id(s: &str) -> Result<u32, ValidationError> {
    let trimmed = s.trim();
    if !is_numeric(trimmed) {
        return Err(ValidationError::NotNumeric(s.to_string()));
    }
    trimmed
        .parse()
        .map_err(|_| ValidationError::NotNumeric(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(validate_email("a@b.c"));
        assert!(validate_email("ram.sharma@school.edu.np"));
        assert!(!validate_email("plain"));
        assert!(!validate_email("@b.c"));
        assert!(!validate_email("a@@b.c"));
        assert!(!validate_email("a@b@c.d"));
        assert!(!validate_email("a@bc"));
        assert!(!validate_email("a@b."));
        assert!(!validate_email(""));
    }

    #[test]
    fn dot_before_at_does_not_count() {
        assert!(!validate_email("first.last@host"));
    }

    #[test]
    fn phone_shapes() {
        assert!(validate_phone("9841234567"));
        assert!(validate_phone("+977 (1) 441-2345"));
        assert!(validate_phone("123-4567"));
        assert!(!validate_phone("123456"));
        assert!(!validate_phone("98412x4567"));
        assert!(!validate_phone(""));
    }

    #[test]
    fn numeric_strings() {
        assert!(is_numeric("0042"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("-1"));
        assert!(!is_numeric("1.5"));
        assert!(!is_numeric("١٢"));
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert_eq!(parse_id(" 17 ").unwrap(), 17);
        assert!(parse_id("abc").is_err());
        assert!(parse_id("99999999999").is_err());
    }

    #[test]
    fn checks_carry_the_input() {
        assert_eq!(
            check_email("nope").unwrap_err(),
            ValidationError::Email("nope".into())
        );
        assert!(check_phone("01-4412345").is_ok());
    }

    #[test]
    fn width_counts_bytes() {
        assert!(check_width("name", "abcd", 4).is_ok());
        assert_eq!(
            check_width("name", "ééé", 4).unwrap_err(),
            ValidationError::TooLong { field: "name", len: 6, max: 4 }
        );
    }
}
