use crate::domain::AppError;

/// Secret store issuing short-lived client tokens.
pub trait SecretStore {
    /// Exchange AppRole credentials for a client token.
    fn approle_login(&self, role_id: &str, secret_id: &str) -> Result<String, AppError>;
}
