//! CLI for gh-bulk. Fully interactive: there are no operational flags.

use anyhow::{Context, Result};
use clap::Parser;
use gh_bulk::prelude::*;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gh-bulk")]
#[command(
    author,
    version,
    about = "Run one command across many GitHub repositories and open a pull request for each",
    long_about = None
)]
struct Cli {}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let _cli = Cli::parse();

    match run() {
        Ok(code) => code,
        Err(e) => {
            println!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Declining or closing a prompt ends the run quietly.
fn aborted() -> ExitCode {
    println!("Aborting...");
    ExitCode::SUCCESS
}

fn run() -> Result<ExitCode> {
    let settings = Settings::from_env().context("Failed to load settings")?;
    let client = GitHubClient::with_base_url(&settings.token, &settings.api_base_url);

    let login = client
        .current_login()
        .context("Failed to fetch the authenticated user")?;

    let mut store = ProfileStore::load(settings.profile_path())
        .context("Failed to load the profile store")?;
    let mut form = TerminalForm::stdio();

    let owner = match resolve_owner(&mut store, &login, &mut form) {
        Err(BulkError::Aborted) => return Ok(aborted()),
        other => other.context("Failed to resolve the account to operate on")?,
    };

    let workspace = Workspace::temporary().context("Failed to create a temporary directory")?;
    let search = GitHubSearch::new(client.clone(), settings.protocol);
    let git = Git::new(settings.git_auth());
    let shell = SystemShell::default();

    let outcome = Session::new(&search, &git, &client, &shell)
        .author(settings.author.clone())
        .on_progress(print_event)
        .run(&mut form, &owner, &workspace)
        .context("Run failed")?;

    if let RunOutcome::Completed(report) = &outcome {
        println!("\n{}", report);
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_event(event: &Event<'_>) {
    match event {
        Event::Started(repo) => println!("Processing repository {}", repo.name),
        Event::Reached(_, Stage::Cloned) => println!("  cloned"),
        Event::Reached(_, Stage::Branched) => println!("  branch created"),
        Event::Reached(_, Stage::CommandRun) => println!("  command finished"),
        Event::Reached(_, Stage::Pushed) => println!("  branch pushed"),
        Event::Reached(_, Stage::PROpened) => println!("  pull request opened"),
        Event::Reached(repo, Stage::Cleaned) => println!("  cleaned up {}", repo.name),
        Event::Reached(_, Stage::NotStarted) => {}
        Event::Failed(repo, failure) => println!("  Error in {}: {}", repo.name, failure),
        Event::CleanupFailed(repo, message) => {
            println!("  Error cleaning {}: {}", repo.name, message)
        }
    }
}
