//! run-puppet: scheduled puppet runner.
//!
//! One run is a linear sequence: random startup delay, fresh shallow clone of
//! the manifest repository, Vault AppRole login, and a `puppet apply`
//! invocation with the obtained token injected as `VAULT_TOKEN`. The exit
//! code of `puppet apply` becomes the program's own exit code.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;


use adapters::{GitManifestSource, PuppetCommand, VaultHttpClient};

pub use app::{MAX_STARTUP_DELAY, Runner};
pub use domain::{AppError, CliOverrides, FileConfig, RunConfig};
pub use domain::{DEFAULT_CONFIG_FILE, DEFAULT_DISABLE_FILE};

/// Execute one run with the production adapters, returning the exit code of
/// the apply tool.
pub fn run(config: RunConfig) -> Result<i32, AppError> {
    let manifests = GitManifestSource::new();
    let vault = VaultHttpClient::new(config.vault_url.clone())?;
    let puppet = PuppetCommand::new(config.bin_path.clone());

    Runner::new(config, manifests, vault, puppet).run()
}
