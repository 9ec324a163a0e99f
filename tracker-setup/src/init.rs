//! Tracing setup
//!
//! Diagnostics go to stderr so stdout carries only progress lines and the
//! summary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset, empty or unparsable
pub const DEFAULT_DIRECTIVE: &str = "tracker_setup=info";

/// Output format of the stderr log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Interpret a `LOG_FORMAT` value; anything but `json` means text
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Build the level filter from a `RUST_LOG` value
///
/// A usable `RUST_LOG` replaces the default entirely, so
/// `tracker_setup=debug` turns on per-command logging and
/// `tracker_setup=off` silences the crate.
pub fn build_filter(rust_log: Option<&str>) -> Result<EnvFilter, String> {
    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(spec) => EnvFilter::try_new(spec).map_err(|e| format!("ignoring RUST_LOG={spec:?}: {e}")),
        None => Ok(EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}

/// Initialize tracing for the CLI from `RUST_LOG` and `LOG_FORMAT`
pub fn init_tracing() -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, rejected) = match build_filter(rust_log.as_deref()) {
        Ok(filter) => (filter, None),
        Err(reason) => (EnvFilter::new(DEFAULT_DIRECTIVE), Some(reason)),
    };

    let format = LogFormat::from_env_value(std::env::var("LOG_FORMAT").ok().as_deref());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init()?,
    }

    if let Some(reason) = rejected {
        tracing::warn!("{}", reason);
    }

    Ok(())
}
