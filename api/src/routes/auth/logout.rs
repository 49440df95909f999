use actix_web::{web, HttpRequest, HttpResponse};

use crate::app::AppState;
use crate::dto::auth::LogoutResponse;
use crate::handlers::error::Language;
use crate::middleware::session::session_token;

use super::removal_cookie;

/// Handler for POST /auth/logout
///
/// Ends the session named by the cookie, if any, and clears the cookie.
/// Always succeeds.
pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let lang = Language::from_request(&req);
    let session_config = &state.config.app.auth.session;

    if let Some(token) = session_token(&req, &session_config.cookie_name) {
        state.auth_service.logout(&token);
    }

    HttpResponse::Ok()
        .cookie(removal_cookie(session_config))
        .json(LogoutResponse {
            success: true,
            message: lang.pick("Logged out", "יצאת מהמערכת").to_string(),
        })
}
