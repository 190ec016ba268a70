//! Error types for shipbranch-publish.

use std::path::PathBuf;

use thiserror::Error;

use shipbranch_core::ConfigError;
use shipbranch_manifest::ManifestError;

pub const BUILD_FAILED_MESSAGE: &str = "Something went wrong while building.";
pub const CLONE_FAILED_MESSAGE: &str = "Something went wrong while cloning the repository.";

/// All errors that can end a run.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Invalid inputs; raised before any external call.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The build manifest was missing or unreadable.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// The compiler exited non-zero.
    #[error("tsc exited with {}", describe_code(.code))]
    Build { code: Option<i32> },

    /// `git clone` exited non-zero.
    #[error("git clone exited with {}: {stderr}", describe_code(.code))]
    Clone { code: Option<i32>, stderr: String },

    /// `git commit` failed for a reason other than an unchanged index.
    #[error("git commit failed: {reason}")]
    CommitFailed { reason: String },

    /// Any other external command exited non-zero.
    #[error("`{command}` exited with {}: {stderr}", describe_code(.code))]
    Command {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// An external program could not be started at all.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The hosting API request failed or returned an unexpected payload.
    #[error("GitHub API error: {0}")]
    Api(String),
}

impl PublishError {
    /// The human-readable line reported when the run fails.
    pub fn headline(&self) -> String {
        match self {
            PublishError::Config(err) => err.to_string(),
            PublishError::Manifest(ManifestError::NotFound { path }) => format!(
                "No TypeScript project found: {} does not exist.",
                path.display()
            ),
            PublishError::Build { .. } => BUILD_FAILED_MESSAGE.to_string(),
            PublishError::Clone { .. } => CLONE_FAILED_MESSAGE.to_string(),
            other => format!("Something went wrong: {other}"),
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Convenience constructor for [`PublishError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PublishError {
    PublishError::Io {
        path: path.into(),
        source,
    }
}
