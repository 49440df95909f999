//! Conversion of core errors into localized HTTP responses.

use actix_web::{
    http::{header, StatusCode},
    HttpRequest, HttpResponse,
};
use tracing::error;
use validator::ValidationErrors;
use wl_core::errors::{extract_english_message, extract_hebrew_message, AuthError};
use wl_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

/// Language preference for user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Hebrew,
}

impl Language {
    /// Detect language preference from the Accept-Language header
    pub fn from_request(req: &HttpRequest) -> Self {
        req.headers()
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(Self::from_header)
            .unwrap_or(Language::English)
    }

    /// Pick the highest-quality supported language, e.g. from
    /// `he-IL,he;q=0.9,en-US;q=0.8`
    pub fn from_header(header_str: &str) -> Self {
        let mut preferred = Language::English;
        let mut max_quality = 0.0_f32;

        for entry in header_str.split(',') {
            let mut parts = entry.trim().split(';');
            let tag = parts.next().unwrap_or("").trim().to_lowercase();
            let quality = parts
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);

            let language = if tag.starts_with("he") || tag.starts_with("iw") {
                Language::Hebrew
            } else if tag.starts_with("en") {
                Language::English
            } else {
                continue;
            };

            if quality > max_quality {
                preferred = language;
                max_quality = quality;
            }
        }

        preferred
    }

    /// Choose between the English and Hebrew variant of a message
    pub fn pick<'a>(&self, en: &'a str, he: &'a str) -> &'a str {
        match self {
            Language::English => en,
            Language::Hebrew => he,
        }
    }

    /// Select one half of a bilingual `"English | Hebrew"` message
    pub fn localize<'a>(&self, message: &'a str) -> &'a str {
        match self {
            Language::English => extract_english_message(message),
            Language::Hebrew => extract_hebrew_message(message),
        }
    }
}

/// HTTP status for each core error
pub fn status_for(error: &AuthError) -> StatusCode {
    match error {
        AuthError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AuthError::LockedOut { .. } => StatusCode::TOO_MANY_REQUESTS,
        AuthError::NotFound => StatusCode::NOT_FOUND,
        AuthError::Expired => StatusCode::GONE,
        AuthError::WrongCode { .. } => StatusCode::BAD_REQUEST,
        AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
        AuthError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render a core error as a localized `ErrorResponse`
pub fn auth_error_response(error: &AuthError, lang: Language) -> HttpResponse {
    if let AuthError::Internal { message } = error {
        error!(error = %message, "Internal authentication error");
    }

    let mut body = error.to_error_response();
    body.message = lang.localize(&body.message).to_string();

    let mut response = HttpResponse::build(status_for(error));
    if let Some(minutes) = error.retry_after_minutes() {
        response.insert_header((header::RETRY_AFTER, (minutes.max(0) * 60).to_string()));
    }
    response.json(body)
}

/// Render request validation failures
pub fn validation_error_response(errors: &ValidationErrors, lang: Language) -> HttpResponse {
    let mut body = ErrorResponse::new(
        error_codes::VALIDATION_ERROR,
        lang.pick("Invalid request data", "נתוני הבקשה אינם תקינים"),
    );

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        body = body.add_detail(field.to_string(), messages);
    }

    HttpResponse::UnprocessableEntity().json(body)
}
