//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call the API with credentials (the web frontend)
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path prefixes served without a token
    #[serde(default = "default_exempt_prefixes")]
    pub exempt_prefixes: Vec<String>,

    /// Mark the session cookie `Secure` (enable behind HTTPS)
    #[serde(default)]
    pub cookie_secure: bool,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_exempt_prefixes() -> Vec<String> {
    vec![
        "/api/auth".to_string(),
        "/api/tutoring-sessions".to_string(),
        "/api/health".to_string(),
    ]
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            exempt_prefixes: default_exempt_prefixes(),
            cookie_secure: false,
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}
