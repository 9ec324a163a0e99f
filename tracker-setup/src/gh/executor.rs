//! Async executor for gh CLI commands
//!
//! [`GhRunner`] is the seam between the provisioning driver and the outside
//! world. [`GhCli`] spawns the real executable; tests substitute a scripted
//! runner.
//!
//! # Example
//!
//! ```rust,ignore
//! use tracker_setup::gh::{GhCli, GhRunner};
//!
//! let gh = GhCli::default();
//! let url = gh.run(&["issue".into(), "create".into(), /* ... */]).await?;
//! ```

use async_trait::async_trait;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, error, instrument};

use super::error::{GhError, GhResult};

/// Runs one gh invocation to completion
#[async_trait]
pub trait GhRunner: Send + Sync {
    /// Run gh with `args` and return its trimmed stdout
    ///
    /// A non-zero exit is reported as [`GhError::CommandFailed`] carrying the
    /// captured stderr.
    async fn run(&self, args: &[String]) -> GhResult<String>;
}

/// Runner backed by the gh executable
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
}

impl GhCli {
    /// Create a runner for the given executable (name on PATH or full path)
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The executable this runner spawns
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check that gh is installed and authenticated
    ///
    /// Runs `gh auth status`; any non-zero exit is an error.
    #[instrument(skip(self), fields(program = %self.program))]
    pub async fn check_available(&self) -> GhResult<()> {
        debug!("checking gh availability");

        let output = self.spawn(&["auth", "status"]).await?;
        if !output.status.success() {
            return Err(exit_error(&output));
        }

        debug!("gh is available and authenticated");
        Ok(())
    }

    async fn spawn<S: AsRef<std::ffi::OsStr>>(&self, args: &[S]) -> GhResult<Output> {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    GhError::NotFound
                } else {
                    GhError::Spawn(e)
                }
            })?
            .wait_with_output()
            .await?;
        Ok(output)
    }
}

impl Default for GhCli {
    fn default() -> Self {
        Self::new("gh")
    }
}

#[async_trait]
impl GhRunner for GhCli {
    #[instrument(skip(self, args), fields(cmd = %describe(args)))]
    async fn run(&self, args: &[String]) -> GhResult<String> {
        debug!(argc = args.len(), "executing {}", self.program);

        let output = self.spawn(args).await?;

        if !output.status.success() {
            return Err(exit_error(&output));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Report a non-zero exit on stderr and turn it into a [`GhError`]
fn exit_error(output: &Output) -> GhError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let code = output.status.code().unwrap_or(-1);

    let err = GhError::from_exit(code, stderr);
    let stderr = err.stderr().unwrap_or_default();
    if matches!(err, GhError::NotAuthenticated { .. }) {
        error!(code, stderr, "gh authentication required");
    } else {
        error!(code, stderr, "gh command failed");
    }
    err
}

/// Short form of an argument list for log fields
///
/// Issue bodies run to hundreds of lines, so only the subcommand is kept.
fn describe(args: &[String]) -> String {
    args.iter()
        .take(2)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
