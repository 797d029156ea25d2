//! Run configuration: defaults, TOML file values, and CLI/env overrides.
//!
//! Precedence, strongest first: CLI flag or environment variable, config
//! file, built-in default. The disable sentinel is applied last and can only
//! force `noop` on.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::domain::AppError;

/// Default location of the optional TOML config file.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/run-puppet/config.toml";
/// Sentinel file whose mere existence forces a dry run.
pub const DEFAULT_DISABLE_FILE: &str = "/etc/puppet_disable";

const DEFAULT_BIN_PATH: &str = "/opt/puppetlabs/bin/puppet";
const DEFAULT_LOCAL_REPO_PATH: &str = "/var/lib/puppet-repo";
const DEFAULT_REMOTE_REPO_URL: &str = "https://github.com/gentoomaniac/puppet.git";
const DEFAULT_VAULT_URL: &str = "https://vault.srv.gentoomaniac.net";
const DEFAULT_ROLE_ID_FILE: &str = "/etc/vault_role_id";
const DEFAULT_SECRET_ID_FILE: &str = "/etc/vault_secret_id";
const DEFAULT_BRANCH: &str = "master";

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Path to the puppet binary.
    pub bin_path: PathBuf,
    /// Local path of the checked out manifest repository.
    pub local_repo_path: PathBuf,
    /// Remote manifest repository to clone from.
    pub remote_repo_url: Url,
    /// Base URL of the Vault instance.
    pub vault_url: Url,
    /// File holding the AppRole role id.
    pub role_id_file: PathBuf,
    /// File holding the AppRole secret id.
    pub secret_id_file: PathBuf,
    /// Manifest branch to check out.
    pub branch: String,
    /// Whether to do a fresh clone before applying.
    pub clone: bool,
    /// Whether to skip the random startup delay.
    pub now: bool,
    /// Whether to run puppet with `--noop`.
    pub noop: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            bin_path: PathBuf::from(DEFAULT_BIN_PATH),
            local_repo_path: PathBuf::from(DEFAULT_LOCAL_REPO_PATH),
            remote_repo_url: Url::parse(DEFAULT_REMOTE_REPO_URL)
                .expect("default remote repo URL is valid"),
            vault_url: Url::parse(DEFAULT_VAULT_URL).expect("default vault URL is valid"),
            role_id_file: PathBuf::from(DEFAULT_ROLE_ID_FILE),
            secret_id_file: PathBuf::from(DEFAULT_SECRET_ID_FILE),
            branch: DEFAULT_BRANCH.to_string(),
            clone: true,
            now: false,
            noop: false,
        }
    }
}

/// Overrides collected from CLI flags and environment variables.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bin_path: Option<PathBuf>,
    pub local_repo_path: Option<PathBuf>,
    pub remote_repo_url: Option<Url>,
    pub vault_url: Option<Url>,
    pub role_id_file: Option<PathBuf>,
    pub secret_id_file: Option<PathBuf>,
    pub branch: Option<String>,
    /// `--no-clone` was passed.
    pub no_clone: bool,
    /// `--now` was passed.
    pub now: bool,
    /// `--noop` was passed.
    pub noop: bool,
}

/// Settings that may come from the TOML config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub bin_path: Option<PathBuf>,
    pub local_repo_path: Option<PathBuf>,
    pub remote_repo_url: Option<Url>,
    pub vault_url: Option<Url>,
    pub role_id_file: Option<PathBuf>,
    pub secret_id_file: Option<PathBuf>,
    pub branch: Option<String>,
    pub clone: Option<bool>,
    pub now: Option<bool>,
    pub noop: Option<bool>,
}

impl FileConfig {
    /// Load file settings from `path`.
    ///
    /// When `required` is false a missing file yields empty settings; any
    /// other read or parse failure is an error either way.
    pub fn load(path: &Path, required: bool) -> Result<Self, AppError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(AppError::ConfigFile {
                    path: path.to_path_buf(),
                    details: err.to_string(),
                });
            }
        };

        toml::from_str(&raw).map_err(|err| AppError::ConfigFile {
            path: path.to_path_buf(),
            details: err.to_string(),
        })
    }
}

impl RunConfig {
    /// Resolve the effective configuration from CLI/env overrides and file
    /// settings.
    pub fn resolve(cli: CliOverrides, file: FileConfig) -> Self {
        let defaults = Self::default();
        Self {
            bin_path: cli.bin_path.or(file.bin_path).unwrap_or(defaults.bin_path),
            local_repo_path: cli
                .local_repo_path
                .or(file.local_repo_path)
                .unwrap_or(defaults.local_repo_path),
            remote_repo_url: cli
                .remote_repo_url
                .or(file.remote_repo_url)
                .unwrap_or(defaults.remote_repo_url),
            vault_url: cli.vault_url.or(file.vault_url).unwrap_or(defaults.vault_url),
            role_id_file: cli.role_id_file.or(file.role_id_file).unwrap_or(defaults.role_id_file),
            secret_id_file: cli
                .secret_id_file
                .or(file.secret_id_file)
                .unwrap_or(defaults.secret_id_file),
            branch: cli.branch.or(file.branch).unwrap_or(defaults.branch),
            clone: if cli.no_clone { false } else { file.clone.unwrap_or(defaults.clone) },
            now: cli.now || file.now.unwrap_or(defaults.now),
            noop: cli.noop || file.noop.unwrap_or(defaults.noop),
        }
    }

    /// Force `noop` when the disable sentinel exists.
    ///
    /// Returns whether the sentinel fired, so the caller can log it.
    pub fn apply_disable_sentinel(&mut self, sentinel: &Path) -> bool {
        if sentinel.exists() {
            self.noop = true;
            true
        } else {
            false
        }
    }
}
