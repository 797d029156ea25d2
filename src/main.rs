use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use url::Url;

use run_puppet::{
    AppError, CliOverrides, DEFAULT_CONFIG_FILE, DEFAULT_DISABLE_FILE, FileConfig, RunConfig,
};

#[derive(Parser)]
#[command(name = "run-puppet")]
#[command(version)]
#[command(about = "Clone the puppet manifests, log in to Vault, and run puppet apply")]
struct Cli {
    /// Path to the puppet binary
    #[arg(long, env = "RUN_PUPPET_BIN_PATH")]
    bin_path: Option<PathBuf>,

    /// Local path for the checked out puppet manifests
    #[arg(long, env = "RUN_PUPPET_LOCAL_REPO_PATH")]
    local_repo_path: Option<PathBuf>,

    /// Manifest repository to clone from
    #[arg(long, env = "RUN_PUPPET_REMOTE_REPO_URL")]
    remote_repo_url: Option<Url>,

    /// URL of the vault instance
    #[arg(long, env = "RUN_PUPPET_VAULT_URL")]
    vault_url: Option<Url>,

    /// Path to the vault approle role id file
    #[arg(long, env = "RUN_PUPPET_ROLE_ID_FILE")]
    role_id_file: Option<PathBuf>,

    /// Path to the vault approle secret id file
    #[arg(long, env = "RUN_PUPPET_SECRET_ID_FILE")]
    secret_id_file: Option<PathBuf>,

    /// Puppet branch to check out
    #[arg(long, env = "RUN_PUPPET_BRANCH")]
    branch: Option<String>,

    /// Skip the fresh clone of the manifest repository
    #[arg(long, env = "RUN_PUPPET_NO_CLONE")]
    no_clone: bool,

    /// Skip the random startup delay
    #[arg(long, env = "RUN_PUPPET_NOW")]
    now: bool,

    /// Don't apply changes, only report what would change
    #[arg(short = 'n', long, env = "RUN_PUPPET_NOOP")]
    noop: bool,

    /// TOML config file providing defaults for the flags above
    #[arg(long, env = "RUN_PUPPET_CONFIG_FILE")]
    config_file: Option<PathBuf>,

    /// Sentinel file whose existence forces --noop
    #[arg(long, env = "RUN_PUPPET_DISABLE_FILE", default_value = DEFAULT_DISABLE_FILE)]
    disable_file: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match execute(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    }
}

fn execute(cli: Cli) -> Result<i32, AppError> {
    let (config_file, required) = match &cli.config_file {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    let file = FileConfig::load(&config_file, required)?;

    let overrides = CliOverrides {
        bin_path: cli.bin_path,
        local_repo_path: cli.local_repo_path,
        remote_repo_url: cli.remote_repo_url,
        vault_url: cli.vault_url,
        role_id_file: cli.role_id_file,
        secret_id_file: cli.secret_id_file,
        branch: cli.branch,
        no_clone: cli.no_clone,
        now: cli.now,
        noop: cli.noop,
    };
    let mut config = RunConfig::resolve(overrides, file);

    if config.apply_disable_sentinel(&cli.disable_file) {
        info!(path = %cli.disable_file.display(), "disable file found, forcing --noop");
    }

    run_puppet::run(config)
}
