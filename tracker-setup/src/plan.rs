//! Provisioning plan
//!
//! A plan is the static set of labels, milestones and issues to create. It is
//! loaded once (from a TOML file or the built-in backlog) and handed to the
//! driver by reference; nothing mutates it afterwards.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Backlog compiled into the binary, used when no plan file is configured
const BUILTIN_PLAN: &str = include_str!("../plans/maaser-tracker.toml");

/// Errors raised while loading a plan
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("failed to read plan {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid plan: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A label to create (or overwrite)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LabelSpec {
    pub name: String,
    /// Hex color without the leading `#`
    pub color: String,
    #[serde(default)]
    pub description: String,
}

/// A milestone to create
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MilestoneSpec {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Due date, written as an RFC 3339 string
    #[serde(default)]
    pub due_on: Option<DateTime<Utc>>,
}

impl MilestoneSpec {
    /// `due_on` in the form the milestones API accepts
    pub fn due_on_param(&self) -> Option<String> {
        self.due_on
            .map(|due| due.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// An issue to create
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueSpec {
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Label names, in the order they are passed to gh
    #[serde(default)]
    pub labels: Vec<String>,
    /// Title of the milestone this issue belongs to
    #[serde(default)]
    pub milestone: Option<String>,
}

impl IssueSpec {
    /// Labels joined the way `gh issue create --label` takes them
    pub fn label_arg(&self) -> String {
        self.labels.join(",")
    }
}

/// Everything one provisioning run creates
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub labels: Vec<LabelSpec>,
    #[serde(default)]
    pub milestones: Vec<MilestoneSpec>,
    #[serde(default)]
    pub issues: Vec<IssueSpec>,
}

impl Plan {
    /// The built-in Ma'aser Tracker backlog
    pub fn builtin() -> Result<Self, PlanError> {
        Self::from_toml_str(BUILTIN_PLAN)
    }

    /// Load a plan from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, PlanError> {
        tracing::debug!("Loading plan from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse a plan from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, PlanError> {
        Ok(toml::from_str(content)?)
    }

    /// Load `path` if given, otherwise the built-in plan
    pub fn load(path: Option<&Path>) -> Result<Self, PlanError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::builtin(),
        }
    }
}
