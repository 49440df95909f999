//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Canonical phone number (E.164: '+', country code, subscriber number)
static CANONICAL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{7,14}$").unwrap()
});

/// Check if a phone number is already in canonical E.164 form.
///
/// No normalization is attempted: `0501234567` or `+972 50-123-4567`
/// are rejected and must be canonicalized by the caller.
pub fn is_canonical_phone(phone: &str) -> bool {
    CANONICAL_PHONE_REGEX.is_match(phone)
}

/// Bring a user-typed Israeli number into canonical form.
///
/// Strips spaces and dashes, then maps `05XXXXXXXX`, `5XXXXXXXX`,
/// `972...` and `0XXXXXXXXX` onto `+972...`. Anything else is returned
/// trimmed but otherwise untouched, so callers still have to check
/// [`is_canonical_phone`].
pub fn normalize_phone(phone: &str) -> String {
    let phone: String = phone
        .trim()
        .chars()
        .filter(|c| *c != '-' && *c != ' ')
        .collect();

    if phone.is_empty() || phone.starts_with('+') {
        return phone;
    }
    if let Some(rest) = phone.strip_prefix("05") {
        return format!("+9725{}", rest);
    }
    if phone.starts_with('5') && phone.len() == 9 {
        return format!("+972{}", phone);
    }
    if phone.starts_with("972") {
        return format!("+{}", phone);
    }
    if let Some(rest) = phone.strip_prefix('0') {
        if phone.len() == 10 {
            return format!("+972{}", rest);
        }
    }
    phone
}

/// Mask a phone number for logs (e.g., `+97250****4567`)
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() < 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_canonical_phone() {
        assert!(is_canonical_phone("+972501234567"));
        assert!(is_canonical_phone("+14155552671"));
        assert!(!is_canonical_phone("0501234567")); // local format
        assert!(!is_canonical_phone("+972 50 123 4567")); // formatting characters
        assert!(!is_canonical_phone("+0123456789")); // invalid country code
        assert!(!is_canonical_phone("+1234")); // too short
        assert!(!is_canonical_phone(""));
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("0501234567"), "+972501234567");
        assert_eq!(normalize_phone(" 050-123-4567 "), "+972501234567");
        assert_eq!(normalize_phone("501234567"), "+972501234567");
        assert_eq!(normalize_phone("972501234567"), "+972501234567");
        assert_eq!(normalize_phone("0312345678"), "+972312345678");
        assert_eq!(normalize_phone("+14155552671"), "+14155552671");
        assert_eq!(normalize_phone("12345"), "12345");
        assert_eq!(normalize_phone("   "), "");
    }

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("+972501234567"), "+97250****4567");
        assert_eq!(mask_phone("12345"), "*****");
        assert_eq!(mask_phone(""), "");
    }
}
