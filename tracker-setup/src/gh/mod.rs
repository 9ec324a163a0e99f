//! gh CLI wrapper module
//!
//! This module runs gh commands and turns their output into identifiers.

pub mod error;
pub mod executor;
pub mod parse;

pub use error::{GhError, GhResult};
pub use executor::{GhCli, GhRunner};
pub use parse::{issue_number_from_url, milestone_number_from_json};
