//! Input Validation
//!
//! Field-level checks shared by every form. Patterns are compiled once.

use regex::Regex;
use std::sync::OnceLock;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(
            r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
        )
        .expect("email pattern is valid")
    })
}

fn phone_re() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^\+?\(?[0-9]{3}\)?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4,6}$").expect("phone pattern is valid")
    })
}

/// Email address check (case-insensitive, no surrounding whitespace)
pub fn validate_email(email: &str) -> bool {
    email_re().is_match(&email.to_lowercase())
}

/// Phone number check; whitespace is ignored
pub fn validate_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    phone_re().is_match(&compact)
}

/// Present and not blank
pub fn validate_required(value: Option<&str>) -> bool {
    value.map_or(false, |v| !v.trim().is_empty())
}

/// At least `min` characters after trimming
pub fn min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for email in ["a@b.co", "user@example.com", "First.Last@Sub.Domain.org", "x+tag@mail.io", "u@[192.168.0.1]"] {
            assert!(validate_email(email), "{email} should be valid");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in ["", "not-an-email", "user@", "@example.com", "user@example", "a b@c.com", "user@exa mple.com", "user@example.c"] {
            assert!(!validate_email(email), "{email} should be invalid");
        }
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("555-123-4567"));
        assert!(!validate_phone("+1 (555) 123 4567"));
        assert!(validate_phone("(555)123-4567"));
        assert!(validate_phone("555 123 4567"));
        assert!(validate_phone("+5551234567"));
        assert!(!validate_phone("12345"));
        assert!(!validate_phone("phone"));
    }

    #[test]
    fn test_required() {
        assert!(validate_required(Some("x")));
        assert!(!validate_required(Some("   ")));
        assert!(!validate_required(Some("")));
        assert!(!validate_required(None));
    }

    #[test]
    fn test_min_chars_counts_characters_not_bytes() {
        assert!(min_chars("héllo", 5));
        assert!(!min_chars("  a ", 2));
        assert!(min_chars("ab", 2));
    }
}
