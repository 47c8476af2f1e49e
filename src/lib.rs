//! TutorIT - tutoring marketplace backend
//!
//! This is the library interface for TutorIT: session-token authentication,
//! the request gate in front of the REST API, and the account directories.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;

pub use auth::{Identity, RequestGate, Role, TokenCodec};
pub use config::Config;
pub use error::Error;
