use actix_web::HttpResponse;

use crate::dto::auth::MeResponse;
use crate::middleware::session::AuthenticatedPhone;

/// Handler for GET /api/v1/me
///
/// Returns the phone of the logged-in user; `401` without a live session.
pub async fn me(auth: AuthenticatedPhone) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        phone: auth.into_inner(),
    })
}
