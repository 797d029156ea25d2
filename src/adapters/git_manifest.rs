//! Manifest checkout adapter.
//!
//! The clone itself goes through the git CLI, which handles every transport
//! (including shallow clones over `file://`); git2 is used afterwards to
//! verify the resulting checkout.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use git2::Repository;
use tracing::info;
use url::Url;

use crate::domain::AppError;
use crate::ports::ManifestSource;

/// Clones the manifest repository with the system git binary.
#[derive(Debug, Clone, Default)]
pub struct GitManifestSource;

impl GitManifestSource {
    pub fn new() -> Self {
        Self
    }

    fn verify_checkout(local: &Path, remote: &Url, branch: &str) -> Result<(), AppError> {
        let clone_failed = |details: String| AppError::CloneFailed { remote: remote.clone(), details };

        let repo = Repository::open(local).map_err(|err| clone_failed(err.to_string()))?;
        let head = repo.head().map_err(|err| clone_failed(err.to_string()))?;
        let checked_out = head
            .shorthand()
            .ok_or_else(|| clone_failed("HEAD has no shorthand".to_string()))?;

        if checked_out != branch {
            return Err(clone_failed(format!(
                "checked out branch '{checked_out}' instead of '{branch}'"
            )));
        }

        Ok(())
    }
}

impl ManifestSource for GitManifestSource {
    fn clone_fresh(&self, local: &Path, remote: &Url, branch: &str) -> Result<(), AppError> {
        match fs::remove_dir_all(local) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                return Err(AppError::CloneFailed {
                    remote: remote.clone(),
                    details: format!("failed removing {}: {}", local.display(), err),
                });
            }
        }

        info!(remote = %remote, branch, local = %local.display(), "cloning manifest repository");

        let output = Command::new("git")
            .arg("clone")
            .args(["--depth", "1", "--single-branch", "--branch", branch])
            .arg(remote.as_str())
            .arg(local)
            .output()
            .map_err(|err| AppError::CloneFailed {
                remote: remote.clone(),
                details: format!("failed to launch git: {err}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(AppError::CloneFailed {
                remote: remote.clone(),
                details: if stderr.is_empty() { "Unknown error".to_string() } else { stderr },
            });
        }

        Self::verify_checkout(local, remote, branch)
    }
}
