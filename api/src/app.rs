//! Application state and factory
//!
//! This module holds the state shared by all handlers and builds the
//! Actix-web application around it.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::InternalError,
    web, App, HttpResponse,
};
use tracing_actix_web::TracingLogger;
use wl_core::AuthService;
use wl_shared::errors::{error_codes, ErrorResponse};

use crate::config::Config;
use crate::delivery::CodeSender;
use crate::handlers::error::{validation_error_response, Language};
use crate::middleware::create_cors;
use crate::routes::{auth, me};

/// Application state that holds shared services
pub struct AppState {
    /// The single authentication core of the process
    pub auth_service: Arc<AuthService>,
    /// Delivers issued codes to users
    pub code_sender: Arc<dyn CodeSender>,
    /// Server configuration
    pub config: Config,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        code_sender: Arc<dyn CodeSender>,
        config: Config,
    ) -> Self {
        Self {
            auth_service,
            code_sender,
            config,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let cors = create_cors(&state.config);

    // Malformed JSON bodies get the same shape as field validation errors
    let json_config = web::JsonConfig::default().error_handler(|err, req| {
        let lang = Language::from_request(req);
        let mut errors = validator::ValidationErrors::new();
        errors.add("body", validator::ValidationError::new("invalid_json"));
        let response = validation_error_response(&errors, lang);
        InternalError::from_response(err, response).into()
    });

    App::new()
        .app_data(state)
        .app_data(json_config)
        // Middleware (last wrapped runs first)
        .wrap(cors)
        .wrap(TracingLogger::default())
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // Login flow
        .service(
            web::scope("/auth")
                .route("/send-code", web::post().to(auth::send_code))
                .route("/verify-code", web::post().to(auth::verify_code))
                .route("/logout", web::post().to(auth::logout))
                .route("/check", web::get().to(auth::check)),
        )
        // Dashboard API, guarded per handler by `AuthenticatedPhone`
        .service(web::scope("/api/v1").route("/me", web::get().to(me::me)))
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "wedledger-auth",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
