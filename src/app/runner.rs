//! The run sequence: delay, clone, credentials, login, apply.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::thread;
use std::time::Duration;

use rand::Rng;
use tracing::{info, warn};

use crate::domain::{AppError, RunConfig};
use crate::ports::{ApplyRequest, ConfigApplier, ManifestSource, SecretStore};

/// Upper bound for the random startup delay.
pub const MAX_STARTUP_DELAY: Duration = Duration::from_secs(5 * 60);

/// Bytes read from each credential file: a UUID plus a trailing newline.
const CREDENTIAL_BYTES: u64 = 37;

/// Sequences one puppet run against the injected dependencies.
pub struct Runner<M, S, A> {
    config: RunConfig,
    manifests: M,
    secrets: S,
    applier: A,
    max_delay: Duration,
}

impl<M, S, A> Runner<M, S, A>
where
    M: ManifestSource,
    S: SecretStore,
    A: ConfigApplier,
{
    pub fn new(config: RunConfig, manifests: M, secrets: S, applier: A) -> Self {
        Self { config, manifests, secrets, applier, max_delay: MAX_STARTUP_DELAY }
    }

    /// Shrink the jitter window so delayed runs stay fast under test.
    #[cfg(test)]
    fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Execute one full run, returning the apply tool's exit code.
    ///
    /// The sequence is strictly linear and aborts on the first failure:
    /// no retries, no partial-state recovery.
    pub fn run(&self) -> Result<i32, AppError> {
        if !self.config.now {
            let delay = sample_delay(&mut rand::rng(), self.max_delay);
            info!(delay_secs = delay.as_secs(), "delaying startup");
            thread::sleep(delay);
        }

        if self.config.clone {
            self.manifests.clone_fresh(
                &self.config.local_repo_path,
                &self.config.remote_repo_url,
                &self.config.branch,
            )?;
        }

        let role_id = read_credential(&self.config.role_id_file)?;
        let secret_id = read_credential(&self.config.secret_id_file)?;
        let token = self.secrets.approle_login(&role_id, &secret_id)?;
        info!("obtained vault client token");

        let request = ApplyRequest {
            manifest_path: self.config.local_repo_path.clone(),
            vault_token: token,
            noop: self.config.noop,
            syslog: !self.config.now,
        };
        let code = self.applier.apply(&request)?;
        if code != 0 {
            warn!(code, "puppet apply finished with a non-zero exit code");
        }

        Ok(code)
    }
}

/// Sample the startup jitter: uniform in `[0, max)`.
fn sample_delay<R: Rng + ?Sized>(rng: &mut R, max: Duration) -> Duration {
    if max.is_zero() {
        return Duration::ZERO;
    }
    Duration::from_millis(rng.random_range(0..u64::try_from(max.as_millis()).unwrap_or(u64::MAX)))
}

/// Read one AppRole credential: the first [`CREDENTIAL_BYTES`] bytes of the
/// file, trimmed of trailing whitespace.
fn read_credential(path: &Path) -> Result<String, AppError> {
    let credential_error = |details: String| AppError::CredentialRead {
        path: path.to_path_buf(),
        details,
    };

    let file = File::open(path).map_err(|err| credential_error(err.to_string()))?;
    let mut raw = Vec::with_capacity(CREDENTIAL_BYTES as usize);
    file.take(CREDENTIAL_BYTES)
        .read_to_end(&mut raw)
        .map_err(|err| credential_error(err.to_string()))?;

    let value = std::str::from_utf8(&raw)
        .map_err(|_| credential_error("credential is not valid UTF-8".to_string()))?
        .trim_end()
        .to_string();

    if value.is_empty() {
        return Err(credential_error("credential file is empty".to_string()));
    }

    Ok(value)
}
