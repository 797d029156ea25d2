//! Vault AppRole login over HTTP.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::domain::AppError;
use crate::ports::SecretStore;

const LOGIN_PATH: &str = "/v1/auth/approle/login";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport for the Vault AppRole login call.
///
/// Performs a single request per call. Login failure is terminal for the
/// whole run, so there is no retry wrapper.
#[derive(Clone)]
pub struct VaultHttpClient {
    vault_url: Url,
    client: Client,
}

impl std::fmt::Debug for VaultHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultHttpClient").field("vault_url", &self.vault_url).finish()
    }
}

impl VaultHttpClient {
    /// Create a new client for the Vault instance at `vault_url`.
    pub fn new(vault_url: Url) -> Result<Self, AppError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(|err| {
            AppError::VaultLogin {
                message: format!("Failed to create HTTP client: {err}"),
                status: None,
            }
        })?;

        Ok(Self { vault_url, client })
    }

    fn login_url(&self) -> Result<Url, AppError> {
        self.vault_url.join(LOGIN_PATH).map_err(|err| {
            AppError::configuration(format!(
                "Invalid vault URL {}: {err}",
                self.vault_url
            ))
        })
    }
}

#[derive(Debug, Serialize)]
struct AppRoleLoginRequest<'a> {
    role_id: &'a str,
    secret_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct AppRoleLoginResponse {
    auth: Option<AuthPayload>,
}

#[derive(Debug, Deserialize)]
struct AuthPayload {
    client_token: String,
}

impl SecretStore for VaultHttpClient {
    fn approle_login(&self, role_id: &str, secret_id: &str) -> Result<String, AppError> {
        let url = self.login_url()?;
        debug!(url = %url, "logging in to vault");

        let response = self
            .client
            .post(url)
            .json(&AppRoleLoginRequest { role_id, secret_id })
            .send()
            .map_err(|err| AppError::VaultLogin {
                message: format!("HTTP request failed: {err}"),
                status: None,
            })?;

        let status = response.status();
        let body = response.text().unwrap_or_default();

        if !status.is_success() {
            let message = extract_error_message(&body)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(AppError::VaultLogin { message, status: Some(status.as_u16()) });
        }

        let parsed: AppRoleLoginResponse =
            serde_json::from_str(&body).map_err(|err| AppError::VaultLogin {
                message: format!("Failed to parse response: {err}"),
                status: Some(status.as_u16()),
            })?;

        let auth = parsed.auth.ok_or_else(|| AppError::VaultLogin {
            message: "No auth payload in response".to_string(),
            status: Some(status.as_u16()),
        })?;

        Ok(auth.client_token)
    }
}

/// Vault error bodies look like `{"errors": ["permission denied"]}`.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let errors = value.get("errors")?.as_array()?;
    let joined = errors.iter().filter_map(|e| e.as_str()).collect::<Vec<_>>().join("; ");
    (!joined.is_empty()).then_some(joined)
}
