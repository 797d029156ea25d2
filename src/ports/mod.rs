//! Trait seams between the run sequence and its side-effecting dependencies.

mod applier;
mod manifest_source;
mod secret_store;

pub use applier::{ApplyRequest, ConfigApplier};
pub use manifest_source::ManifestSource;
pub use secret_store::SecretStore;
