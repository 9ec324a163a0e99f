//! Configuration loading
//!
//! Settings come from, in decreasing priority:
//! 1. Command-line flags / `TRACKER_SETUP_*` environment variables
//! 2. `.tracker-setup.toml` (nearest ancestor of the cwd, then
//!    `~/.config/tracker-setup/`)
//! 3. Default values

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Name of the config file searched for
pub const CONFIG_FILE_NAME: &str = ".tracker-setup.toml";

/// Errors in configuration values
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid repository {0:?}: expected OWNER/REPO")]
    InvalidRepo(String),
}

/// A repository in `OWNER/REPO` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    owner: String,
    name: String,
}

impl Repo {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the milestones collection for `gh api`
    pub fn milestones_endpoint(&self) -> String {
        format!("/repos/{}/{}/milestones", self.owner, self.name)
    }

    /// Web URL of the issue list
    pub fn issues_url(&self) -> String {
        format!("https://github.com/{}/{}/issues", self.owner, self.name)
    }
}

impl FromStr for Repo {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(ConfigError::InvalidRepo(s.to_string())),
        }
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// ============================================================================
// File configuration (.tracker-setup.toml)
// ============================================================================

/// Top-level file configuration
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub github: GithubSection,
    #[serde(default)]
    pub plan: PlanSection,
}

/// `[github]` section
#[derive(Debug, Default, Deserialize)]
pub struct GithubSection {
    pub repo: Option<String>,
    pub gh_path: Option<String>,
}

/// `[plan]` section
#[derive(Debug, Default, Deserialize)]
pub struct PlanSection {
    /// Plan file; relative paths are taken from the config file's directory
    pub path: Option<PathBuf>,
}

fn default_repo() -> String {
    "DubiWork/maaser-tracker".to_string()
}

fn default_gh_path() -> String {
    "gh".to_string()
}

/// Find `filename` in `start` or one of its ancestors
fn find_config_file_from(start: &Path, filename: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.is_file())
}

/// Find a config file by walking up from the cwd, then checking global config
fn find_config_file(filename: &str) -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(found) = find_config_file_from(&cwd, filename) {
            return Some(found);
        }
    }

    let global_path = dirs::config_dir()?.join("tracker-setup").join(filename);
    global_path.is_file().then_some(global_path)
}

impl FileConfig {
    /// Load `explicit` if given, otherwise search for [`CONFIG_FILE_NAME`]
    ///
    /// A missing explicit file is an error; finding nothing by search yields
    /// the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file(CONFIG_FILE_NAME),
        };

        match path {
            Some(path) => {
                tracing::debug!("Loading config from: {}", path.display());
                Self::load_from_path(&path)
            }
            None => {
                tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                Ok(Self::default())
            }
        }
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;

        if let (Some(plan), Some(dir)) = (config.plan.path.as_mut(), path.parent()) {
            if plan.is_relative() {
                *plan = dir.join(&*plan);
            }
        }

        Ok(config)
    }
}

// ============================================================================
// Resolved settings
// ============================================================================

/// Values supplied on the command line or through the environment
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub repo: Option<String>,
    pub gh_path: Option<String>,
    pub plan: Option<PathBuf>,
}

/// Settings for one run, after layering
#[derive(Debug, Clone)]
pub struct Settings {
    pub repo: Repo,
    pub gh_path: String,
    /// `None` selects the built-in plan
    pub plan: Option<PathBuf>,
}

impl Settings {
    /// Layer overrides on top of the file config and defaults
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Result<Self, ConfigError> {
        let repo = overrides
            .repo
            .or(file.github.repo)
            .unwrap_or_else(default_repo)
            .parse()?;
        let gh_path = overrides
            .gh_path
            .or(file.github.gh_path)
            .unwrap_or_else(default_gh_path);
        let plan = overrides.plan.or(file.plan.path);

        Ok(Self {
            repo,
            gh_path,
            plan,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_parse() {
        let repo: Repo = "DubiWork/maaser-tracker".parse().unwrap();
        assert_eq!(repo.owner(), "DubiWork");
        assert_eq!(repo.name(), "maaser-tracker");
        assert_eq!(repo.to_string(), "DubiWork/maaser-tracker");
        assert_eq!(
            repo.milestones_endpoint(),
            "/repos/DubiWork/maaser-tracker/milestones"
        );
        assert_eq!(
            repo.issues_url(),
            "https://github.com/DubiWork/maaser-tracker/issues"
        );
    }

    #[test]
    fn test_repo_parse_rejects_malformed() {
        for bad in ["", "owner", "/repo", "owner/", "a/b/c"] {
            assert_eq!(
                bad.parse::<Repo>(),
                Err(ConfigError::InvalidRepo(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = Settings::resolve(Overrides::default(), FileConfig::default()).unwrap();
        assert_eq!(settings.repo.to_string(), "DubiWork/maaser-tracker");
        assert_eq!(settings.gh_path, "gh");
        assert_eq!(settings.plan, None);
    }

    #[test]
    fn test_resolve_precedence() {
        let file: FileConfig = toml::from_str(
            r#"
            [github]
            repo = "file/repo"
            gh_path = "/opt/gh"

            [plan]
            path = "/plans/file.toml"
            "#,
        )
        .unwrap();
        let overrides = Overrides {
            repo: Some("cli/repo".to_string()),
            ..Default::default()
        };

        let settings = Settings::resolve(overrides, file).unwrap();
        assert_eq!(settings.repo.to_string(), "cli/repo");
        assert_eq!(settings.gh_path, "/opt/gh");
        assert_eq!(settings.plan, Some(PathBuf::from("/plans/file.toml")));
    }

    #[test]
    fn test_load_resolves_relative_plan_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[plan]\npath = \"backlog.toml\"\n").unwrap();

        let config = FileConfig::load(Some(&path)).unwrap();
        assert_eq!(config.plan.path, Some(dir.path().join("backlog.toml")));
        assert_eq!(config.github.repo, None);
    }

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();

        let found = find_config_file_from(&nested, CONFIG_FILE_NAME);
        assert_eq!(found, Some(dir.path().join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        assert!(FileConfig::load(Some(Path::new("/nonexistent/.tracker-setup.toml"))).is_err());
    }
}
