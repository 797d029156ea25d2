//! Production implementations of the ports.

pub mod git_manifest;
pub mod puppet_command;
pub mod vault_http;

pub use git_manifest::GitManifestSource;
pub use puppet_command::PuppetCommand;
pub use vault_http::VaultHttpClient;
