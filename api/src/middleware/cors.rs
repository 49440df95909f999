//! CORS configuration for the dashboard front-end.
//!
//! Development allows any origin; production only the configured ones.
//! Credentials are always supported since the session travels in a cookie.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use tracing::info;

use crate::config::Config;

/// Creates a CORS middleware instance configured for the current environment.
pub fn create_cors(config: &Config) -> Cors {
    let base = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .max_age(config.cors.max_age)
        .supports_credentials();

    if config.is_development() {
        return base.allow_any_origin();
    }

    config
        .cors
        .allowed_origins
        .iter()
        .fold(base, |cors, origin| {
            info!("Adding allowed origin: {}", origin);
            cors.allowed_origin(origin)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    fn production_config(origins: &[&str]) -> Config {
        let mut config = Config::development();
        config.app.environment = wl_shared::config::Environment::Production;
        config.cors.allowed_origins = origins.iter().map(|o| o.to_string()).collect();
        config
    }

    #[actix_rt::test]
    async fn test_production_allows_configured_origin() {
        let config = production_config(&["https://wedledger.app"]);
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&config))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://wedledger.app"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://wedledger.app"
        );
    }

    #[actix_rt::test]
    async fn test_production_rejects_unknown_origin() {
        let config = production_config(&["https://wedledger.app"]);
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&config))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://evil.example"))
            .to_request();
        // the origin is either refused outright or answered without CORS headers
        if let Ok(resp) = test::try_call_service(&app, req).await {
            assert!(resp
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none());
        }
    }
}
