use actix_web::{web, HttpRequest, HttpResponse};
use wl_core::{SessionCheckResponse, SessionStatus};

use crate::app::AppState;
use crate::middleware::session::session_token;

/// Handler for GET /auth/check
///
/// Reports whether the request carries a live session. Never an error;
/// a successful check refreshes the session's idle deadline.
///
/// ```json
/// { "authenticated": true, "phone": "+972501234567" }
/// ```
pub async fn check(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let cookie_name = &state.config.app.auth.session.cookie_name;

    let status = match session_token(&req, cookie_name) {
        Some(token) => state.auth_service.validate_session(&token),
        None => SessionStatus::Unauthenticated,
    };

    HttpResponse::Ok().json(SessionCheckResponse::from(status))
}
