//! Shared testing harness for `run-puppet` CLI tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;

use assert_cmd::Command;
use tempfile::TempDir;

#[allow(dead_code)]
pub const ROLE_ID: &str = "d2f3a1b4-5678-4abc-9def-0123456789ab";
#[allow(dead_code)]
pub const SECRET_ID: &str = "9f8e7d6c-5b4a-4321-8765-fedcba987654";
#[allow(dead_code)]
pub const CLIENT_TOKEN: &str = "s.integration-token";

/// JSON body a successful AppRole login returns.
#[allow(dead_code)]
pub const LOGIN_RESPONSE: &str =
    r#"{"auth": {"client_token": "s.integration-token", "lease_duration": 3600}}"#;

/// Isolated environment: upstream manifest repo, credential files, a stub
/// puppet binary that records its invocation, and a scratch checkout path.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    args_file: PathBuf,
    token_file: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment with credential files in place.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let args_file = root.path().join("puppet-args.txt");
        let token_file = root.path().join("puppet-token.txt");

        fs::write(root.path().join("role_id"), format!("{ROLE_ID}\n"))
            .expect("Failed to write role id file");
        fs::write(root.path().join("secret_id"), format!("{SECRET_ID}\n"))
            .expect("Failed to write secret id file");

        Self { root, args_file, token_file }
    }

    /// Initialize the upstream manifest repository on `branch` and return its
    /// `file://` URL.
    pub fn upstream_repo(&self, branch: &str) -> String {
        let upstream = self.root.path().join("upstream");
        fs::create_dir_all(&upstream).expect("Failed to create upstream directory");
        fs::create_dir_all(upstream.join("manifests")).expect("Failed to create manifests dir");
        fs::write(upstream.join("puppet.conf"), "[main]\n").expect("Failed to write puppet.conf");
        fs::write(upstream.join("manifests/site.pp"), "node default {}\n")
            .expect("Failed to write site.pp");

        let git = |args: &[&str]| {
            let output = StdCommand::new("git")
                .args(args)
                .current_dir(&upstream)
                .output()
                .expect("Failed to run git");
            assert!(
                output.status.success(),
                "git {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stderr)
            );
        };
        git(&["init", &format!("--initial-branch={branch}")]);
        git(&["config", "user.name", "Test User"]);
        git(&["config", "user.email", "test@example.com"]);
        git(&["add", "."]);
        git(&["commit", "-m", "initial manifests"]);

        format!("file://{}", upstream.display())
    }

    /// Write a stub puppet binary that records its argv and `VAULT_TOKEN`,
    /// then exits with `exit_code`.
    #[cfg(unix)]
    pub fn stub_puppet(&self, exit_code: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root.path().join("puppet");
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\nprintf '%s' \"$VAULT_TOKEN\" > '{}'\nexit {}\n",
            self.args_file.display(),
            self.token_file.display(),
            exit_code,
        );
        fs::write(&path, script).expect("Failed to write puppet stub");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to set stub permissions");
        path
    }

    /// Argv the stub was invoked with, one argument per line.
    pub fn recorded_args(&self) -> Option<Vec<String>> {
        let raw = fs::read_to_string(&self.args_file).ok()?;
        Some(raw.lines().map(str::to_string).collect())
    }

    /// `VAULT_TOKEN` value the stub saw.
    pub fn recorded_token(&self) -> Option<String> {
        fs::read_to_string(&self.token_file).ok()
    }

    /// Whether the stub ran at all.
    pub fn puppet_ran(&self) -> bool {
        self.args_file.exists()
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn local_repo(&self) -> PathBuf {
        self.root.path().join("checkout")
    }

    pub fn role_id_file(&self) -> PathBuf {
        self.root.path().join("role_id")
    }

    pub fn secret_id_file(&self) -> PathBuf {
        self.root.path().join("secret_id")
    }

    /// Build a command with the environment scrubbed and the common wiring
    /// (stub binary, checkout path, credentials, vault URL, no delay) applied.
    #[cfg(unix)]
    pub fn cli(&self, vault_url: &str, exit_code: i32) -> Command {
        let mut cmd = self.bare_cli();
        cmd.arg("--bin-path").arg(self.stub_puppet(exit_code));
        cmd.arg("--local-repo-path").arg(self.local_repo());
        cmd.arg("--vault-url").arg(vault_url);
        cmd.arg("--role-id-file").arg(self.role_id_file());
        cmd.arg("--secret-id-file").arg(self.secret_id_file());
        cmd.arg("--disable-file").arg(self.root.path().join("puppet_disable"));
        cmd.arg("--now");
        cmd
    }

    /// Build a command with only the environment scrubbed.
    pub fn bare_cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("run-puppet").expect("Failed to locate run-puppet binary");
        for (name, _) in std::env::vars_os() {
            if name.to_string_lossy().starts_with("RUN_PUPPET_") {
                cmd.env_remove(name);
            }
        }
        cmd.env_remove("RUST_LOG");
        cmd
    }
}
