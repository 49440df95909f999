use actix_web::{web, HttpRequest, HttpResponse};
use tracing::warn;
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth::{VerifyCodeRequest, VerifyCodeResponse};
use crate::handlers::error::{auth_error_response, validation_error_response, Language};

use super::{canonical_phone, session_cookie};

/// Handler for POST /auth/verify-code
///
/// Verifies the submitted code and, on success, sets the session cookie
/// (HttpOnly, SameSite=Lax, Path=/, Max-Age = session duration).
///
/// # Request Body
///
/// ```json
/// { "phone": "0501234567", "code": "112233" }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Wrong code (`remaining_attempts`)
/// - 404 Not Found: No pending code
/// - 410 Gone: Code expired
/// - 422 Unprocessable Entity: Malformed phone or code
/// - 429 Too Many Requests: Phone is locked out (`retry_after_minutes`)
pub async fn verify_code(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<VerifyCodeRequest>,
) -> HttpResponse {
    let lang = Language::from_request(&req);

    if let Err(errors) = request.validate() {
        warn!("Validation failed for verify_code request: {}", errors);
        return validation_error_response(&errors, lang);
    }

    let phone = match canonical_phone(&request.phone) {
        Ok(phone) => phone,
        Err(error) => return auth_error_response(&error, lang),
    };

    match state.auth_service.verify_code(&phone, &request.code) {
        Ok(session) => {
            let cookie = session_cookie(&state.config.app.auth.session, session.token);
            HttpResponse::Ok().cookie(cookie).json(VerifyCodeResponse {
                success: true,
                message: lang.pick("Verified successfully", "אימות הצליח").to_string(),
            })
        }
        Err(error) => auth_error_response(&error, lang),
    }
}
