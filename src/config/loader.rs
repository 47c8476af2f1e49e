//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "tutorit.toml";

/// Load configuration from tutorit.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Load from `path` if given, else search for tutorit.toml, falling back to
/// defaults when no file exists
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config_from_path(path),
        None => match load_config() {
            Err(Error::ConfigNotFound) => {
                tracing::warn!("No {} found, using default configuration", CONFIG_FILENAME);
                Ok(Config::default())
            }
            other => other,
        },
    }
}

fn validate(config: &Config) -> Result<()> {
    if !(4..=31).contains(&config.auth.bcrypt_cost) {
        return Err(Error::Config(format!(
            "auth.bcrypt_cost must be between 4 and 31, got {}",
            config.auth.bcrypt_cost
        )));
    }
    if let Some(prefix) = config
        .auth
        .exempt_prefixes
        .iter()
        .find(|p| !p.starts_with('/'))
    {
        return Err(Error::Config(format!(
            "auth.exempt_prefixes entries must start with '/', got '{}'",
            prefix
        )));
    }
    Ok(())
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# TutorIT backend configuration

[server]
host = "0.0.0.0"
port = 8080
# Frontend origins allowed to send credentialed requests
allowed_origins = ["http://localhost:3000"]

[auth]
# Requests under these prefixes skip token checks
exempt_prefixes = ["/api/auth", "/api/tutoring-sessions", "/api/health"]
# Set to true when served over HTTPS
cookie_secure = ${TUTORIT_COOKIE_SECURE:-false}
bcrypt_cost = 12
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${TUTORIT_NONEXISTENT_VAR:-default_value}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"default_value\"");
    }

    #[test]
    fn test_default_content_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(default_config_content().as_bytes()).unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.auth.exempt_prefixes.contains(&"/api/auth".to_string()));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[server]\nport = 9000\n").unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn test_rejects_relative_prefix() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[auth]\nexempt_prefixes = [\"api/auth\"]\n").unwrap();

        assert!(matches!(
            load_config_from_path(file.path()),
            Err(Error::Config(_))
        ));
    }
}
