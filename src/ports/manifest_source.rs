use std::path::Path;

use url::Url;

use crate::domain::AppError;

/// Source of the manifest working copy.
pub trait ManifestSource {
    /// Replace `local` with a fresh shallow, single-branch clone of `branch`
    /// from `remote`.
    ///
    /// Any existing content at `local` is removed first. There is no partial
    /// recovery: a failure leaves whatever state the clone got to and aborts
    /// the run.
    fn clone_fresh(&self, local: &Path, remote: &Url, branch: &str) -> Result<(), AppError>;
}
