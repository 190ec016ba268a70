//! Build-and-publish workflow.
//!
//! ## Sequence
//!
//! 1. Read the build manifest (once, before anything is mutated).
//! 2. Install the compiler, compile. Stop here when publishing is disabled.
//! 3. Authorizing → Listing → GitConfiguring → Cloning → BranchResolving →
//!    Syncing → Cleaning (opt-in) → Committing → Pushing → Done.
//!
//! Steps never overlap and nothing is retried. A failure at any stage ends the
//! run; the clone directory or an unpushed local commit may be left behind.

use std::fmt;

use shipbranch_core::{BranchState, PublishConfig, RunConfig};
use shipbranch_manifest::OutputLocation;

use crate::compiler;
use crate::copy;
use crate::error::PublishError;
use crate::git::{self, CommitOutcome};
use crate::github::BranchLister;
use crate::process::ProcessRunner;

// ---------------------------------------------------------------------------
// Stages and outcomes
// ---------------------------------------------------------------------------

/// Publish stages, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authorizing,
    Listing,
    GitConfiguring,
    Cloning,
    BranchResolving,
    Syncing,
    Cleaning,
    Committing,
    Pushing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Authorizing => "authorizing",
            Stage::Listing => "listing",
            Stage::GitConfiguring => "git-configuring",
            Stage::Cloning => "cloning",
            Stage::BranchResolving => "branch-resolving",
            Stage::Syncing => "syncing",
            Stage::Cleaning => "cleaning",
            Stage::Committing => "committing",
            Stage::Pushing => "pushing",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a publish run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Branch name pushed to on the remote.
    pub remote_branch: String,
    pub state: BranchState,
    pub files_copied: usize,
    pub commit: CommitOutcome,
}

/// Terminal state of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Publishing disabled; stopped after the build.
    Built,
    Published(PublishReport),
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// Runs one build-and-publish invocation over the given collaborators.
pub struct Workflow<'a> {
    runner: &'a dyn ProcessRunner,
    branches: &'a dyn BranchLister,
}

impl<'a> Workflow<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, branches: &'a dyn BranchLister) -> Self {
        Self { runner, branches }
    }

    /// Build, then publish when `config.publish` is set.
    pub fn run(&self, config: &RunConfig) -> Result<RunOutcome, PublishError> {
        let manifest = shipbranch_manifest::load(&config.working_dir)?;
        let location = manifest.locate(&config.working_dir);

        compiler::install(self.runner, &config.typescript_version)?;
        compiler::compile(self.runner, &config.working_dir)?;

        let Some(publish) = &config.publish else {
            tracing::info!("Pushing to a branch is disabled; done after build");
            return Ok(RunOutcome::Built);
        };

        self.publish(config, publish, &location).map(RunOutcome::Published)
    }

    fn publish(
        &self,
        config: &RunConfig,
        publish: &PublishConfig,
        location: &OutputLocation,
    ) -> Result<PublishReport, PublishError> {
        // A PublishConfig always carries a token; nothing to verify beyond that.
        enter(Stage::Authorizing);

        enter(Stage::Listing);
        let listed = self.branches.list_branches(publish)?;

        enter(Stage::GitConfiguring);
        tracing::info!("Configuring Git user");
        git::configure_identity(self.runner, &publish.identity)?;

        enter(Stage::Cloning);
        tracing::info!("Cloning branch");
        let clone_dir = publish.clone_dir();
        let url = git::authenticated_url(
            &publish.server_url,
            &publish.actor,
            &publish.token,
            &publish.repository,
        );
        git::clone(self.runner, &url, &clone_dir, &publish.token)?;

        enter(Stage::BranchResolving);
        let state = BranchState::resolve(&publish.branch, listed.iter().map(String::as_str));
        match &state {
            BranchState::Existing { remote_name } => {
                tracing::info!(branch = %remote_name, "Checking out existing branch")
            }
            BranchState::Missing => {
                tracing::info!(branch = %publish.branch, "Creating orphan branch")
            }
        }
        git::checkout(self.runner, &clone_dir, &publish.branch, &state)?;

        enter(Stage::Syncing);
        tracing::info!("Copying compiled files");
        let files_copied = copy::copy_contents(&location.output_dir, &clone_dir)?;

        if publish.clean_sources {
            enter(Stage::Cleaning);
            match &location.source_root {
                Some(source_root) => {
                    tracing::info!("Removing source files");
                    let removed =
                        copy::clean_sources(&config.working_dir, &clone_dir, source_root)?;
                    for path in removed {
                        tracing::debug!(path = %path.display(), "removed");
                    }
                }
                None => tracing::debug!("no rootDir declared; skipping cleanup"),
            }
        }

        enter(Stage::Committing);
        tracing::info!("Adding files");
        git::stage_all(self.runner, &clone_dir)?;
        tracing::info!("Committing");
        let message = format!("build: {}", publish.sha);
        let commit = git::commit(self.runner, &clone_dir, &message)?;
        if commit == CommitOutcome::NoChangesToCommit {
            tracing::warn!("Couldn't commit new changes because there aren't any");
        }

        enter(Stage::Pushing);
        tracing::info!("Pushing new changes");
        let remote_branch = match &state {
            BranchState::Existing { remote_name } => remote_name.clone(),
            BranchState::Missing => publish.branch.0.clone(),
        };
        git::push(self.runner, &clone_dir, &remote_branch, &publish.token)?;

        enter(Stage::Done);
        Ok(PublishReport {
            remote_branch,
            state,
            files_copied,
            commit,
        })
    }
}

fn enter(stage: Stage) {
    tracing::debug!(%stage, "entering stage");
}
