use std::fmt;
use std::path::PathBuf;

use crate::domain::AppError;

/// One invocation of the external apply tool.
#[derive(Clone)]
pub struct ApplyRequest {
    /// Root of the manifest working copy; `puppet.conf` and
    /// `manifests/site.pp` are derived from it.
    pub manifest_path: PathBuf,
    /// Vault token injected as `VAULT_TOKEN`.
    pub vault_token: String,
    /// Pass `--noop` so no changes are applied.
    pub noop: bool,
    /// Log to syslog, used for delayed (scheduled) runs.
    pub syslog: bool,
}

impl fmt::Debug for ApplyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplyRequest")
            .field("manifest_path", &self.manifest_path)
            .field("vault_token", &"[REDACTED]")
            .field("noop", &self.noop)
            .field("syslog", &self.syslog)
            .finish()
    }
}

/// Runner of the external configuration-management tool.
pub trait ConfigApplier {
    /// Run the apply tool with inherited stdio and return its exit code.
    ///
    /// A non-zero exit code is a normal outcome; only failing to launch the
    /// tool at all is an error.
    fn apply(&self, request: &ApplyRequest) -> Result<i32, AppError>;
}
