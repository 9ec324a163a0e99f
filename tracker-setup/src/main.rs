//! tracker-setup
//!
//! Creates the labels, milestones and issues of a plan in a GitHub repository
//! using the GitHub CLI (`gh`).
//!
//! # Usage
//!
//! ```bash
//! tracker-setup --repo owner/repo apply
//! tracker-setup show --plan backlog.toml
//! ```
//!
//! Individual record failures are reported and skipped; `apply` always exits
//! successfully once the plan has been loaded.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tracker_setup::config::{FileConfig, Overrides, Settings};
use tracker_setup::gh::GhCli;
use tracker_setup::init::init_tracing;
use tracker_setup::plan::Plan;
use tracker_setup::provision::provision;

#[derive(Parser)]
#[command(name = "tracker-setup")]
#[command(about = "Provision GitHub labels, milestones and issues via the gh CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Target repository (OWNER/REPO)
    #[arg(long, short, global = true, env = "TRACKER_SETUP_REPO")]
    repo: Option<String>,

    /// gh executable to run
    #[arg(long, global = true, env = "TRACKER_SETUP_GH")]
    gh: Option<String>,

    /// Config file (default: nearest .tracker-setup.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create every label, milestone and issue in the plan
    Apply {
        /// Plan file (default: built-in backlog)
        #[arg(long, short, env = "TRACKER_SETUP_PLAN")]
        plan: Option<PathBuf>,
    },
    /// Print the plan without touching GitHub
    Show {
        /// Plan file (default: built-in backlog)
        #[arg(long, short, env = "TRACKER_SETUP_PLAN")]
        plan: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let file = FileConfig::load(cli.config.as_deref())?;

    let (plan_override, apply) = match cli.command {
        Commands::Apply { plan } => (plan, true),
        Commands::Show { plan } => (plan, false),
    };

    let settings = Settings::resolve(
        Overrides {
            repo: cli.repo,
            gh_path: cli.gh,
            plan: plan_override,
        },
        file,
    )?;

    let plan = Plan::load(settings.plan.as_deref()).context("failed to load plan")?;

    if apply {
        run_apply(&settings, &plan).await;
    } else {
        show_plan(&plan);
    }

    Ok(())
}

async fn run_apply(settings: &Settings, plan: &Plan) {
    let gh = GhCli::new(&settings.gh_path);

    if let Err(e) = gh.check_available().await {
        tracing::warn!(gh = gh.program(), "gh CLI check failed: {}", e);
        // Continue anyway - errors will be reported per record
    }

    let summary = provision(&gh, &settings.repo, plan).await;

    println!("\n{}", summary);
    println!("\nView at: {}", settings.repo.issues_url());
}

fn show_plan(plan: &Plan) {
    println!(
        "Plan: {} labels, {} milestones, {} issues",
        plan.labels.len(),
        plan.milestones.len(),
        plan.issues.len()
    );

    println!("\nLabels:");
    for label in &plan.labels {
        println!("  {:<16} #{}  {}", label.name, label.color, label.description);
    }

    println!("\nMilestones:");
    for milestone in &plan.milestones {
        match milestone.due_on_param() {
            Some(due) => println!("  {} (due {})", milestone.title, due),
            None => println!("  {}", milestone.title),
        }
    }

    println!("\nIssues:");
    for issue in &plan.issues {
        let milestone = issue.milestone.as_deref().unwrap_or("-");
        println!("  {} [{}] -> {}", issue.title, issue.label_arg(), milestone);
    }
}
