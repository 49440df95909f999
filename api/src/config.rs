//! API configuration: the shared application config plus HTTP-only knobs.

use wl_shared::config::AppConfig;

/// Configuration of the HTTP server
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment, server, auth and logging settings
    pub app: AppConfig,
    /// Cross-origin settings
    pub cors: CorsConfig,
}

/// Allowed origins for browser clients
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Exact origins allowed in production
    pub allowed_origins: Vec<String>,
    /// Preflight cache lifetime in seconds
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age: 3600,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let app = AppConfig::from_vars(&lookup);

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let max_age = lookup("CORS_MAX_AGE")
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        Self {
            app,
            cors: CorsConfig {
                allowed_origins,
                max_age,
            },
        }
    }

    /// Development config with insecure cookies, for local runs and tests
    pub fn development() -> Self {
        Self {
            app: AppConfig::development(),
            cors: CorsConfig::default(),
        }
    }

    pub fn is_development(&self) -> bool {
        self.app.environment.is_development()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_cors_origins_parsed() {
        let config = Config::from_vars(lookup(&[
            ("ENVIRONMENT", "production"),
            ("ALLOWED_ORIGINS", "https://wedledger.app, ,https://admin.wedledger.app"),
            ("CORS_MAX_AGE", "600"),
        ]));

        assert!(!config.is_development());
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://wedledger.app", "https://admin.wedledger.app"]
        );
        assert_eq!(config.cors.max_age, 600);
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(lookup(&[]));
        assert!(config.is_development());
        assert!(config.cors.allowed_origins.is_empty());
        assert_eq!(config.cors.max_age, 3600);
    }
}
