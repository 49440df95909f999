//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - OTP, lockout, session and cleanup configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration

pub mod auth;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::{AuthConfig, CleanupConfig, OtpConfig, SessionConfig, MAX_DURATION_SECONDS};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        let mut auth = AuthConfig::default();
        auth.session.secure = false;
        Self {
            environment: Environment::Development,
            server: ServerConfig::new("127.0.0.1", 8080),
            auth,
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::new("0.0.0.0", 8080),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = Environment::from_vars(&lookup);
        let base = match environment {
            Environment::Production => Self::production(),
            Environment::Development | Environment::Staging => Self::development(),
        };

        let mut logging = LoggingConfig::for_environment(environment);
        if let Some(level) = lookup("LOG_LEVEL") {
            logging.level = level;
        }

        Self {
            environment,
            server: ServerConfig::from_vars(&lookup, base.server),
            auth: AuthConfig::from_vars(&lookup, base.auth),
            logging,
        }
    }
}
