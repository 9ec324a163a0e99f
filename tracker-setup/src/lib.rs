//! GitHub tracker provisioning
//!
//! Populates a repository with labels, milestones and issues from a static
//! plan by driving the `gh` CLI, one command per record.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use tracker_setup::{gh::GhCli, plan::Plan, provision::provision};
//!
//! let plan = Plan::builtin()?;
//! let summary = provision(&GhCli::default(), &"owner/repo".parse()?, &plan).await;
//! println!("{summary}");
//! ```
//!
//! # Requirements
//! - `gh` CLI installed and authenticated (`gh auth login`)

pub mod config;
pub mod gh;
pub mod init;
pub mod plan;
pub mod provision;

pub use config::{Repo, Settings};
pub use plan::Plan;
pub use provision::{provision, Summary};
