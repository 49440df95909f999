//! Authentication route handlers
//!
//! This module contains the login flow endpoints:
//! - Sending and verifying codes
//! - Logout
//! - Session status check

pub mod check;
pub mod logout;
pub mod send_code;
pub mod verify_code;

pub use check::check;
pub use logout::logout;
pub use send_code::send_code;
pub use verify_code::verify_code;

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use wl_core::{AuthError, AuthResult};
use wl_shared::config::SessionConfig;
use wl_shared::utils::phone::{is_canonical_phone, normalize_phone};

/// Canonical form of a user-typed phone, or a validation error
pub(crate) fn canonical_phone(input: &str) -> AuthResult<String> {
    let phone = normalize_phone(input);
    if is_canonical_phone(&phone) {
        Ok(phone)
    } else {
        Err(AuthError::validation(
            "phone",
            "not a valid phone number (e.g. 0501234567)",
        ))
    }
}

/// Cookie carrying a freshly minted session token
pub(crate) fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone(), token)
        .path("/")
        .http_only(config.http_only)
        .secure(config.secure)
        .same_site(same_site(&config.same_site))
        .max_age(CookieDuration::seconds(config.duration().num_seconds()))
        .finish()
}

/// Cookie instructing the browser to drop the session token
pub(crate) fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build(config.cookie_name.clone(), "")
        .path("/")
        .http_only(config.http_only)
        .secure(config.secure)
        .same_site(same_site(&config.same_site))
        .finish();
    cookie.make_removal();
    cookie
}

fn same_site(value: &str) -> SameSite {
    match value.to_ascii_lowercase().as_str() {
        "strict" => SameSite::Strict,
        "none" => SameSite::None,
        _ => SameSite::Lax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_phone() {
        assert_eq!(canonical_phone("050-123-4567").unwrap(), "+972501234567");
        assert_eq!(canonical_phone("+972501234567").unwrap(), "+972501234567");
        assert!(matches!(
            canonical_phone("12345"),
            Err(AuthError::Validation { .. })
        ));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let config = SessionConfig::default();
        let cookie = session_cookie(&config, "abc".to_string());

        assert_eq!(cookie.name(), "session_token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(CookieDuration::seconds(3600)));
    }

    #[test]
    fn test_removal_cookie_expires() {
        let cookie = removal_cookie(&SessionConfig::default());
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }
}
