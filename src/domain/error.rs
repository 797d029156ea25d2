use std::io;
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Library-wide error type for run-puppet operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Config file could not be read or parsed.
    #[error("Failed to load config file {}: {details}", path.display())]
    ConfigFile { path: PathBuf, details: String },

    /// Replacing the local manifest working copy failed.
    #[error("Failed cloning manifest repository from {remote}: {details}")]
    CloneFailed { remote: Url, details: String },

    /// A credential file could not be read or was empty.
    #[error("Failed reading credential file {}: {details}", path.display())]
    CredentialRead { path: PathBuf, details: String },

    /// The Vault AppRole login call failed.
    #[error("Vault login failed: {message}")]
    VaultLogin { message: String, status: Option<u16> },

    /// The puppet binary could not be launched at all.
    #[error("Failed to launch {}: {details}", bin.display())]
    ApplyLaunch { bin: PathBuf, details: String },
}

impl AppError {
    pub(crate) fn configuration<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }
}
