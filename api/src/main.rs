use std::sync::Arc;

use actix_web::{web, HttpServer};
use tracing::info;

use wl_api::config::Config;
use wl_api::delivery::LogCodeSender;
use wl_api::{create_app, telemetry, AppState};
use wl_core::AuthService;
use wl_shared::config::Environment;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Environment-specific file first; dotenvy never overrides a set variable
    dotenvy::from_filename(Environment::from_env().env_file()).ok();
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    telemetry::init_tracing(&config.app.logging);

    info!(
        environment = %config.app.environment,
        "Starting WedLedger auth server"
    );

    let auth_service = Arc::new(
        AuthService::new(config.app.auth.clone())
            .with_code_logging(config.app.environment.is_development()),
    );

    // Sweeps expired codes, sessions and lockouts off the request path
    let cleanup = Arc::new(auth_service.cleanup_service());
    let _cleanup_task = cleanup.start_background_task();

    let state = web::Data::new(AppState::new(
        auth_service,
        Arc::new(LogCodeSender::new(
            config.is_development(),
            config.app.auth.otp.code_ttl_seconds / 60,
        )),
        config.clone(),
    ));

    let bind_address = config.app.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if config.app.server.workers > 0 {
        server = server.workers(config.app.server.workers);
    }

    server.bind(&bind_address)?.run().await?;
    Ok(())
}
