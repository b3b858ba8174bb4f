//! Field Rules
//!
//! Per-field checks for each form. A rule returns the message to show next to
//! the field, or `Ok(())`. Values are expected trimmed.

use crate::utils::validation::{min_chars, validate_email, validate_phone, validate_required};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
pub const INVALID_PHONE: &str = "Please enter a valid phone number.";
pub const NAME_TOO_SHORT: &str = "Name must be at least 2 characters.";
pub const COMPANY_TOO_SHORT: &str = "Company name must be at least 2 characters.";
pub const MESSAGE_TOO_SHORT: &str = "Message must be at least 10 characters.";
pub const EMAIL_REQUIRED: &str = "Email is required.";

/// Form-level message when any field fails
pub const FIX_ERRORS: &str = "Please fix the errors above and try again.";

pub type RuleResult = Result<(), &'static str>;

fn required(value: &str, is_required: bool) -> RuleResult {
    if is_required && !validate_required(Some(value)) {
        return Err(REQUIRED);
    }
    Ok(())
}

/// Rules shared by the contact and application forms. Empty optional
/// fields always pass.
fn common(name: &str, value: &str) -> RuleResult {
    if value.is_empty() {
        return Ok(());
    }
    match name {
        "email" if !validate_email(value) => Err(INVALID_EMAIL),
        "name" if !min_chars(value, 2) => Err(NAME_TOO_SHORT),
        _ => Ok(()),
    }
}

pub fn contact_field(name: &str, value: &str, is_required: bool) -> RuleResult {
    required(value, is_required)?;
    common(name, value)?;
    if value.is_empty() {
        return Ok(());
    }
    match name {
        "company" if !min_chars(value, 2) => Err(COMPANY_TOO_SHORT),
        "notes" if !min_chars(value, 10) => Err(MESSAGE_TOO_SHORT),
        _ => Ok(()),
    }
}

pub fn application_field(name: &str, value: &str, is_required: bool) -> RuleResult {
    required(value, is_required)?;
    common(name, value)?;
    if value.is_empty() {
        return Ok(());
    }
    match name {
        "phone" if !validate_phone(value) => Err(INVALID_PHONE),
        "message" if !min_chars(value, 10) => Err(MESSAGE_TOO_SHORT),
        _ => Ok(()),
    }
}

pub fn newsletter_email(value: &str) -> RuleResult {
    if value.is_empty() {
        return Err(EMAIL_REQUIRED);
    }
    if !validate_email(value) {
        return Err(INVALID_EMAIL);
    }
    Ok(())
}
