//! Email validation for the login form.
//!
//! The submit action is enabled only while the email passes this check.
//! It is recomputed on every input change; there is no stored validation
//! state beyond the returned boolean.

/// Whether an email is plausible enough to enable the submit action.
///
/// Requires more than 5 characters, an `@`, and a `.` somewhere after the
/// `@`. This is deliberately not full RFC address parsing; the server has
/// the final say.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().count() <= 5 {
        return false;
    }
    match email.find('@') {
        Some(at) => email[at..].contains('.'),
        None => false,
    }
}
