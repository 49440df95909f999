//! Server configuration module

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
            workers: 0, // Use all CPU cores
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Overlay `SERVER_HOST`, `SERVER_PORT` (or `PORT`) and `SERVER_WORKERS`
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>, base: Self) -> Self {
        let mut config = base;
        if let Some(host) = lookup("SERVER_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|p| p.parse().ok())
        {
            config.port = port;
        }
        if let Some(workers) = lookup("SERVER_WORKERS").and_then(|w| w.parse().ok()) {
            config.workers = workers;
        }
        config
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = ServerConfig::new("127.0.0.1", 3000);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_port_fallback_variable() {
        let config = ServerConfig::from_vars(
            |key| (key == "PORT").then(|| "8181".to_string()),
            ServerConfig::default(),
        );
        assert_eq!(config.port, 8181);
        assert_eq!(config.host, "0.0.0.0");
    }
}
