//! CLI output formatting utilities

use colored::Colorize;

use crate::config::Config;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Print the effective configuration
pub fn print_config_summary(config: &Config) {
    println!("{}", "Configuration".bold().underline());
    println!();
    println!(
        "  {} {}:{}",
        "Listen:".bold(),
        config.server.host,
        config.server.port
    );
    println!(
        "  {} {}",
        "Allowed origins:".bold(),
        config.server.allowed_origins.join(", ")
    );
    println!(
        "  {} {}",
        "Secure cookie:".bold(),
        if config.auth.cookie_secure {
            "yes".green()
        } else {
            "no".yellow()
        }
    );
    println!("  {} {}", "bcrypt cost:".bold(), config.auth.bcrypt_cost);

    println!();
    println!("  {}", "Exempt path prefixes:".bold());
    if config.auth.exempt_prefixes.is_empty() {
        println!("    {}", "(none, every route requires a token)".dimmed());
    }
    for prefix in &config.auth.exempt_prefixes {
        println!("    - {}", prefix.cyan());
    }
}
