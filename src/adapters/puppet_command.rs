//! `puppet apply` invocation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::domain::AppError;
use crate::ports::{ApplyRequest, ConfigApplier};

const VAULT_TOKEN_VAR: &str = "VAULT_TOKEN";

/// Runs the puppet binary with inherited stdio.
#[derive(Debug, Clone)]
pub struct PuppetCommand {
    bin_path: PathBuf,
}

impl PuppetCommand {
    pub fn new(bin_path: PathBuf) -> Self {
        Self { bin_path }
    }
}

/// Argument list for one `puppet apply` invocation.
fn apply_args(manifest_path: &Path, noop: bool, syslog: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "apply".into(),
        "--config".into(),
        manifest_path.join("puppet.conf").into(),
        "-vvvt".into(),
        manifest_path.join("manifests/site.pp").into(),
    ];
    if noop {
        args.push("--noop".into());
    }
    if syslog {
        args.push("-l".into());
        args.push("syslog".into());
    }
    args
}

impl ConfigApplier for PuppetCommand {
    fn apply(&self, request: &ApplyRequest) -> Result<i32, AppError> {
        let args = apply_args(&request.manifest_path, request.noop, request.syslog);
        debug!(bin = %self.bin_path.display(), ?args, "invoking puppet apply");

        // stdio and environment are inherited; only the token is added.
        let status = Command::new(&self.bin_path)
            .args(&args)
            .env(VAULT_TOKEN_VAR, &request.vault_token)
            .status()
            .map_err(|err| AppError::ApplyLaunch {
                bin: self.bin_path.clone(),
                details: err.to_string(),
            })?;

        // None means the process was killed by a signal.
        Ok(status.code().unwrap_or(-1))
    }
}
