//! CLI interface for TutorIT

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tutorit")]
#[command(version)]
#[command(about = "Backend for the TutorIT tutoring marketplace", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default tutorit.toml configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long, env = "TUTORIT_HOST")]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(short, long, env = "TUTORIT_PORT")]
        port: Option<u16>,

        /// Path to the configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate the configuration and print the effective settings
    Check {
        /// Path to the configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
