//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{error, info, print_config_summary, success, warn};
use crate::config::{self, loader::CONFIG_FILENAME, Config};

/// Write a default tutorit.toml configuration file
pub async fn init(force: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() && !force {
        warn(&format!("{} already exists (use --force to overwrite)", CONFIG_FILENAME));
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Edit the configuration file and run 'tutorit serve' to start the API");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(host: Option<String>, port: Option<u16>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server at http://{}:{}", host, port));
    if !config.auth.cookie_secure {
        warn("Session cookies are not marked Secure; enable auth.cookie_secure behind HTTPS");
    }

    if let Err(e) = crate::api::run_server(config, &host, port).await {
        error(&format!("Server stopped: {}", e));
        return Err(e.into());
    }

    Ok(())
}

/// Validate and print the configuration
pub async fn check(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    print_config_summary(&config);
    println!();
    success("Configuration is valid");
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    config::load_or_default(path).map_err(|e| anyhow::anyhow!("{}", e))
}
