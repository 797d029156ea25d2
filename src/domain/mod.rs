//! Domain types: configuration and errors.

mod config;
mod error;

pub use config::{CliOverrides, DEFAULT_CONFIG_FILE, DEFAULT_DISABLE_FILE, FileConfig, RunConfig};
pub use error::AppError;
