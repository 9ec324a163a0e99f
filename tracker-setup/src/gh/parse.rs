//! Identifier extraction from gh output
//!
//! gh's output formats are the one external contract the driver depends on:
//! `gh issue create` prints the new issue URL and `gh api` prints the created
//! resource as JSON.

use serde::Deserialize;

use super::error::{GhError, GhResult};

/// The part of a milestone API response we use
#[derive(Debug, Deserialize)]
struct MilestoneCreated {
    number: u64,
}

/// Take the issue number from the URL printed by `gh issue create`
///
/// The identifier is the text after the last `/`, kept verbatim.
pub fn issue_number_from_url(output: &str) -> GhResult<&str> {
    let output = output.trim();
    match output.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => Ok(segment),
        _ => Err(GhError::UnexpectedOutput(output.to_string())),
    }
}

/// Take the milestone number from a `POST /repos/{owner}/{repo}/milestones` response
pub fn milestone_number_from_json(output: &str) -> GhResult<u64> {
    let output = output.trim();
    if output.is_empty() {
        return Err(GhError::UnexpectedOutput(String::new()));
    }
    let created: MilestoneCreated = serde_json::from_str(output)?;
    Ok(created.number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_number_is_last_segment() {
        let id = issue_number_from_url("https://github.com/DubiWork/maaser-tracker/issues/42").unwrap();
        assert_eq!(id, "42");
    }

    #[test]
    fn test_issue_number_without_separator_is_whole_output() {
        assert_eq!(issue_number_from_url("17").unwrap(), "17");
    }

    #[test]
    fn test_issue_number_rejects_empty_and_trailing_slash() {
        assert!(matches!(
            issue_number_from_url(""),
            Err(GhError::UnexpectedOutput(_))
        ));
        assert!(matches!(
            issue_number_from_url("https://github.com/o/r/issues/"),
            Err(GhError::UnexpectedOutput(_))
        ));
    }

    #[test]
    fn test_milestone_number_from_api_response() {
        let body = r#"{"url":"https://api.github.com/repos/o/r/milestones/7","number":7,"title":"v0.2.0 - Foundation","state":"open"}"#;
        assert_eq!(milestone_number_from_json(body).unwrap(), 7);
    }

    #[test]
    fn test_milestone_number_errors() {
        assert!(matches!(
            milestone_number_from_json(""),
            Err(GhError::UnexpectedOutput(_))
        ));
        assert!(matches!(
            milestone_number_from_json("not json"),
            Err(GhError::Parse(_))
        ));
        assert!(matches!(
            milestone_number_from_json(r#"{"title":"no number"}"#),
            Err(GhError::Parse(_))
        ));
        assert!(matches!(
            milestone_number_from_json(r#"{"number":"7"}"#),
            Err(GhError::Parse(_))
        ));
    }
}
