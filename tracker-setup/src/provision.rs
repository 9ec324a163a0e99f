//! Provisioning driver
//!
//! Runs the three phases of a plan in order: labels, milestones, issues.
//! Each record gets exactly one gh invocation. A record that fails is logged
//! and skipped; the batch never stops early and nothing is retried.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{info, warn};

use crate::config::Repo;
use crate::gh::{issue_number_from_url, milestone_number_from_json, GhResult, GhRunner};
use crate::plan::{IssueSpec, LabelSpec, MilestoneSpec, Plan};

/// Milestone numbers keyed by milestone title
pub type MilestoneIds = BTreeMap<String, u64>;

/// Issue numbers keyed by issue title
pub type IssueIds = BTreeMap<String, String>;

/// Outcome of a provisioning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub labels_declared: usize,
    pub labels_created: usize,
    pub milestones_declared: usize,
    pub milestones_created: usize,
    pub issues_created: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "✅ Setup complete!")?;
        writeln!(f, "   Labels declared: {}", self.labels_declared)?;
        writeln!(f, "   Milestones declared: {}", self.milestones_declared)?;
        write!(f, "   Issues created: {}", self.issues_created)
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Arguments for `gh label create`, with `--force` so an existing label is updated
pub fn label_args(repo: &Repo, label: &LabelSpec) -> Vec<String> {
    let repo = repo.to_string();
    owned(&[
        "label",
        "create",
        &label.name,
        "--color",
        &label.color,
        "--description",
        &label.description,
        "--repo",
        &repo,
        "--force",
    ])
}

/// Arguments for creating a milestone through `gh api`
pub fn milestone_args(repo: &Repo, milestone: &MilestoneSpec) -> Vec<String> {
    let mut args = owned(&["api", &repo.milestones_endpoint()]);
    args.push("-f".to_string());
    args.push(format!("title={}", milestone.title));
    args.push("-f".to_string());
    args.push(format!("description={}", milestone.description));
    args.push("-f".to_string());
    args.push("state=open".to_string());
    if let Some(due_on) = milestone.due_on_param() {
        args.push("-f".to_string());
        args.push(format!("due_on={}", due_on));
    }
    args
}

/// Arguments for `gh issue create`
///
/// `--milestone` is added only when the issue names a milestone that was
/// created in this run. Anything else leaves the issue without one.
pub fn issue_args(repo: &Repo, issue: &IssueSpec, milestone_ids: &MilestoneIds) -> Vec<String> {
    let repo = repo.to_string();
    let labels = issue.label_arg();
    let mut args = owned(&[
        "issue",
        "create",
        "--title",
        &issue.title,
        "--body",
        &issue.body,
        "--label",
        &labels,
        "--repo",
        &repo,
    ]);

    if let Some(id) = issue
        .milestone
        .as_ref()
        .and_then(|title| milestone_ids.get(title))
    {
        args.push("--milestone".to_string());
        args.push(id.to_string());
    }

    args
}

async fn create_label<R: GhRunner + ?Sized>(runner: &R, repo: &Repo, label: &LabelSpec) -> GhResult<()> {
    runner.run(&label_args(repo, label)).await?;
    Ok(())
}

async fn create_milestone<R: GhRunner + ?Sized>(
    runner: &R,
    repo: &Repo,
    milestone: &MilestoneSpec,
) -> GhResult<u64> {
    let output = runner.run(&milestone_args(repo, milestone)).await?;
    milestone_number_from_json(&output)
}

async fn create_issue<R: GhRunner + ?Sized>(
    runner: &R,
    repo: &Repo,
    issue: &IssueSpec,
    milestone_ids: &MilestoneIds,
) -> GhResult<String> {
    let output = runner.run(&issue_args(repo, issue, milestone_ids)).await?;
    issue_number_from_url(&output).map(str::to_string)
}

/// Create or overwrite every label; returns how many succeeded
pub async fn create_labels<R: GhRunner + ?Sized>(runner: &R, repo: &Repo, labels: &[LabelSpec]) -> usize {
    println!("Creating labels...");
    let mut created = 0;

    for label in labels {
        match create_label(runner, repo, label).await {
            Ok(()) => {
                created += 1;
                println!("  ✓ Created label: {}", label.name);
            }
            Err(e) => warn!(label = %label.name, error = %e, "skipping label"),
        }
    }

    info!(created, declared = labels.len(), "label phase finished");
    created
}

/// Create every milestone; returns the numbers of those that succeeded
pub async fn create_milestones<R: GhRunner + ?Sized>(
    runner: &R,
    repo: &Repo,
    milestones: &[MilestoneSpec],
) -> MilestoneIds {
    println!("\nCreating milestones...");
    let mut ids = MilestoneIds::new();

    for milestone in milestones {
        match create_milestone(runner, repo, milestone).await {
            Ok(number) => {
                println!("  ✓ Created milestone: {} (#{})", milestone.title, number);
                ids.insert(milestone.title.clone(), number);
            }
            Err(e) => warn!(milestone = %milestone.title, error = %e, "skipping milestone"),
        }
    }

    info!(created = ids.len(), declared = milestones.len(), "milestone phase finished");
    ids
}

/// Create every issue; returns the numbers of those that succeeded
pub async fn create_issues<R: GhRunner + ?Sized>(
    runner: &R,
    repo: &Repo,
    issues: &[IssueSpec],
    milestone_ids: &MilestoneIds,
) -> IssueIds {
    println!("\nCreating issues...");
    let mut ids = IssueIds::new();

    for issue in issues {
        if let Some(ref title) = issue.milestone {
            if !milestone_ids.contains_key(title) {
                warn!(issue = %issue.title, milestone = %title, "milestone unavailable, creating issue without it");
            }
        }

        match create_issue(runner, repo, issue, milestone_ids).await {
            Ok(number) => {
                println!("  ✓ Created issue #{}: {}", number, issue.title);
                ids.insert(issue.title.clone(), number);
            }
            Err(e) => warn!(issue = %issue.title, error = %e, "skipping issue"),
        }
    }

    info!(created = ids.len(), declared = issues.len(), "issue phase finished");
    ids
}

/// Run all three phases against `repo`
pub async fn provision<R: GhRunner + ?Sized>(runner: &R, repo: &Repo, plan: &Plan) -> Summary {
    println!("Setting up GitHub issues for {}\n", repo);

    let labels_created = create_labels(runner, repo, &plan.labels).await;
    let milestone_ids = create_milestones(runner, repo, &plan.milestones).await;
    let issue_ids = create_issues(runner, repo, &plan.issues, &milestone_ids).await;

    Summary {
        labels_declared: plan.labels.len(),
        labels_created,
        milestones_declared: plan.milestones.len(),
        milestones_created: milestone_ids.len(),
        issues_created: issue_ids.len(),
    }
}
