//! Session guard for dashboard routes.
//!
//! Handlers that take an [`AuthenticatedPhone`] argument only run for
//! requests carrying a live session cookie; everything else is answered with
//! `401 SESSION_EXPIRED`.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, error::InternalError, web, Error, FromRequest, HttpRequest};
use tracing::{debug, error};
use wl_core::{AuthError, SessionStatus};
use wl_shared::utils::phone::mask_phone;

use crate::app::AppState;
use crate::handlers::error::{auth_error_response, Language};

/// Phone of the session that made the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPhone(pub String);

impl AuthenticatedPhone {
    pub fn phone(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Session token carried by the request's cookie, if any
pub fn session_token(req: &HttpRequest, cookie_name: &str) -> Option<String> {
    req.cookie(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

impl FromRequest for AuthenticatedPhone {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedPhone, Error> {
    let lang = Language::from_request(req);

    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        error!("AppState missing from application data");
        return Err(reject(AuthError::internal("application state missing"), lang));
    };

    let cookie_name = &state.config.app.auth.session.cookie_name;
    let Some(token) = session_token(req, cookie_name) else {
        debug!(path = %req.path(), "Request without session cookie");
        return Err(reject(AuthError::SessionExpired, lang));
    };

    match state.auth_service.validate_session(&token) {
        SessionStatus::Authenticated { phone } => {
            debug!(phone = %mask_phone(&phone), path = %req.path(), "Session accepted");
            Ok(AuthenticatedPhone(phone))
        }
        SessionStatus::Unauthenticated => {
            debug!(path = %req.path(), "Invalid or idle session");
            Err(reject(AuthError::SessionExpired, lang))
        }
    }
}

fn reject(error: AuthError, lang: Language) -> Error {
    let response = auth_error_response(&error, lang);
    InternalError::from_response(error, response).into()
}
