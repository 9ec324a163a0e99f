//! Error types for gh CLI operations
//!
//! Every record the provisioning driver attempts yields a [`GhResult`]. A
//! failure is local to that record; the batch loop logs it and moves on.

use thiserror::Error;

/// Errors that can occur when executing gh CLI commands
#[derive(Error, Debug)]
pub enum GhError {
    /// gh exited non-zero
    #[error("gh command failed (exit code {code}): {stderr}")]
    CommandFailed { code: i32, stderr: String },

    /// gh exited non-zero and asked for `gh auth login`
    #[error("gh CLI not authenticated - run 'gh auth login' first: {stderr}")]
    NotAuthenticated { stderr: String },

    #[error("failed to spawn gh process: {0}")]
    Spawn(#[from] std::io::Error),

    /// A success reply that should have been JSON was not usable
    #[error("failed to parse gh JSON output: {0}")]
    Parse(#[from] serde_json::Error),

    /// gh succeeded but printed something we cannot take an identifier from
    #[error("unexpected gh output: {0:?}")]
    UnexpectedOutput(String),

    #[error("gh CLI not found - ensure gh is installed and in PATH")]
    NotFound,
}

impl GhError {
    /// Build the error for a non-zero exit from its captured stderr
    pub fn from_exit(code: i32, stderr: String) -> Self {
        if stderr.contains("gh auth login") || stderr.contains("not logged in") {
            Self::NotAuthenticated { stderr }
        } else {
            Self::CommandFailed { code, stderr }
        }
    }

    /// What gh wrote to stderr, for failures that came from a finished process
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { stderr, .. } | Self::NotAuthenticated { stderr } => Some(stderr),
            _ => None,
        }
    }
}

/// Result type alias for gh operations
pub type GhResult<T> = Result<T, GhError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_exit_classifies_auth_failures() {
        let err = GhError::from_exit(4, "HTTP 401: Bad credentials; try gh auth login".to_string());
        assert!(matches!(err, GhError::NotAuthenticated { .. }));
        assert_eq!(err.stderr(), Some("HTTP 401: Bad credentials; try gh auth login"));
        assert!(err.to_string().contains("HTTP 401: Bad credentials"));

        let err = GhError::from_exit(1, "You are not logged in to any GitHub hosts.".to_string());
        assert!(matches!(err, GhError::NotAuthenticated { .. }));
    }

    #[test]
    fn test_from_exit_keeps_code_for_other_failures() {
        let err = GhError::from_exit(1, "HTTP 422: Validation Failed".to_string());
        match err {
            GhError::CommandFailed { code, ref stderr } => {
                assert_eq!(code, 1);
                assert_eq!(stderr, "HTTP 422: Validation Failed");
            }
            ref other => panic!("expected CommandFailed, got {other:?}"),
        }
        assert!(err.to_string().contains("exit code 1"));
    }

    #[test]
    fn test_stderr_absent_without_process_output() {
        assert_eq!(GhError::NotFound.stderr(), None);
        assert_eq!(GhError::UnexpectedOutput(String::new()).stderr(), None);
    }
}
