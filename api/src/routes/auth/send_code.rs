use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{error, info, warn};
use validator::Validate;
use wl_shared::utils::phone::mask_phone;

use crate::app::AppState;
use crate::delivery::CodeSender;
use crate::dto::auth::{SendCodeRequest, SendCodeResponse};
use crate::handlers::error::{auth_error_response, validation_error_response, Language};

use super::canonical_phone;

/// Handler for POST /auth/send-code
///
/// Issues a code for the phone and hands it to the code sender in the
/// background; the response never waits on delivery.
///
/// # Request Body
///
/// ```json
/// { "phone": "0501234567" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "success": true, "message": "Verification code sent via WhatsApp", "expires_in": 600 }
/// ```
/// In development the code is echoed back as `dev_code`.
///
/// ## Errors
/// - 422 Unprocessable Entity: Missing or malformed phone
/// - 429 Too Many Requests: Phone is locked out (`retry_after_minutes`)
pub async fn send_code(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<SendCodeRequest>,
) -> HttpResponse {
    let lang = Language::from_request(&req);

    if let Err(errors) = request.validate() {
        warn!("Validation failed for send_code request: {}", errors);
        return validation_error_response(&errors, lang);
    }

    let phone = match canonical_phone(&request.phone) {
        Ok(phone) => phone,
        Err(error) => return auth_error_response(&error, lang),
    };

    match state.auth_service.request_code(&phone) {
        Ok(issued) => {
            let expires_in = (issued.expires_at - issued.issued_at).num_seconds();
            let dev_code = state
                .config
                .is_development()
                .then(|| issued.code.clone());

            dispatch_code(Arc::clone(&state.code_sender), issued.phone, issued.code);

            HttpResponse::Ok().json(SendCodeResponse {
                success: true,
                message: lang
                    .pick("Verification code sent via WhatsApp", "קוד נשלח בווטסאפ")
                    .to_string(),
                dev_code,
                expires_in,
            })
        }
        Err(error) => auth_error_response(&error, lang),
    }
}

fn dispatch_code(sender: Arc<dyn CodeSender>, phone: String, code: String) {
    actix_web::rt::spawn(async move {
        match sender.send_code(&phone, &code).await {
            Ok(()) => info!(phone = %mask_phone(&phone), "Verification code dispatched"),
            Err(error) => error!(
                phone = %mask_phone(&phone),
                error = %error,
                "Failed to deliver verification code"
            ),
        }
    });
}
