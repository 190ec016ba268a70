//! shipbranch: compile a TypeScript project and publish the output to a branch.
//!
//! # Usage
//!
//! ```text
//! shipbranch [--push-to-branch true|false] [--branch <name>] [--github-token <token>]
//!            [--clean-sources true|false] [--typescript-version <version>]
//!            [--working-dir <path>]
//! ```
//!
//! Every flag falls back to the environment a GitHub Actions runner provides
//! (`INPUT_*`, `GITHUB_*`), so the binary can run as an action step unchanged.

mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use shipbranch_core::{Inputs, RunConfig};
use shipbranch_publish::{GitHubApi, PublishError, RunOutcome, SystemRunner, Workflow};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "shipbranch",
    version,
    about = "Compile a TypeScript project and publish its output to a branch",
    long_about = None,
)]
struct Cli {
    /// Publish the compiled output after building (true/false).
    #[arg(long, env = "INPUT_PUSHTOBRANCH")]
    push_to_branch: Option<String>,

    /// Branch that receives the compiled output.
    #[arg(long, env = "INPUT_BRANCH")]
    branch: Option<String>,

    /// Token used for the hosting API and for cloning/pushing.
    #[arg(long, env = "INPUT_GITHUBTOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Remove the declared rootDir after copying (true/false).
    #[arg(long, env = "INPUT_CLEANSOURCES")]
    clean_sources: Option<String>,

    /// TypeScript version installed before compiling.
    #[arg(long, env = "INPUT_TYPESCRIPTVERSION")]
    typescript_version: Option<String>,

    /// Project directory containing tsconfig.json [default: current directory].
    #[arg(long, env = "GITHUB_WORKSPACE")]
    working_dir: Option<PathBuf>,

    /// Repository as `owner/name`.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// User name embedded in the clone URL.
    #[arg(long, env = "GITHUB_ACTOR")]
    actor: Option<String>,

    /// Commit identifier used in the `build: <sha>` message.
    #[arg(long, env = "GITHUB_SHA")]
    sha: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", hide = true)]
    api_url: Option<String>,

    #[arg(long, env = "GITHUB_SERVER_URL", hide = true)]
    server_url: Option<String>,
}

impl Cli {
    fn run(self) -> Result<RunOutcome> {
        let cwd = std::env::current_dir().context("reading current directory")?;
        let inputs = Inputs {
            push_to_branch: self.push_to_branch,
            branch: self.branch,
            token: self.github_token,
            clean_sources: self.clean_sources,
            typescript_version: self.typescript_version,
            working_dir: self.working_dir.unwrap_or_else(|| cwd.clone()),
            clone_parent: cwd,
            repository: self.repository,
            actor: self.actor,
            sha: self.sha,
            api_url: self.api_url,
            server_url: self.server_url,
        };
        let config = RunConfig::from_inputs(inputs).map_err(PublishError::from)?;

        tracing::debug!(
            working_dir = %config.working_dir.display(),
            push = config.push_enabled(),
            "configuration loaded"
        );

        let api = GitHubApi::new();
        let outcome = Workflow::new(&SystemRunner, &api).run(&config)?;
        Ok(outcome)
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    init_tracing();
    match Cli::parse().run() {
        Ok(outcome) => {
            report::success(&outcome);
            ExitCode::SUCCESS
        }
        Err(err) => {
            report::failure(&err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
