//! # shipbranch-publish
//!
//! Compile a TypeScript project and publish its output to a branch.
//!
//! Call [`Workflow::run`] with a validated [`shipbranch_core::RunConfig`].
//! External effects go through two seams: [`ProcessRunner`] for npm, tsc and
//! git, and [`BranchLister`] for the hosting API.

pub mod compiler;
pub mod copy;
pub mod error;
pub mod fakes;
pub mod git;
pub mod github;
pub mod process;
pub mod workflow;

pub use error::PublishError;
pub use git::CommitOutcome;
pub use github::{BranchLister, GitHubApi};
pub use process::{Exit, Invocation, ProcessRunner, SystemRunner};
pub use workflow::{PublishReport, RunOutcome, Stage, Workflow};
