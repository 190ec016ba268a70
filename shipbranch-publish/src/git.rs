//! Git commands used by the publish workflow.
//!
//! Each function issues one logical git operation through a [`ProcessRunner`].

use std::path::Path;

use shipbranch_core::{BranchName, BranchState, Credential, GitIdentity, RepoSlug};

use crate::error::PublishError;
use crate::process::{Invocation, ProcessRunner};

/// Result of a commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// The index matched `HEAD`; nothing was committed.
    NoChangesToCommit,
}

fn git(dir: &Path) -> Invocation {
    Invocation::new("git").cwd(dir)
}

/// Set the process-wide commit author.
pub fn configure_identity(
    runner: &dyn ProcessRunner,
    identity: &GitIdentity,
) -> Result<(), PublishError> {
    for (key, value) in [("user.name", &identity.name), ("user.email", &identity.email)] {
        runner.run_checked(
            &Invocation::new("git").args(["config", "--global", key, value.as_str()]),
        )?;
    }
    Ok(())
}

/// `<scheme>://<actor>:<token>@<host>/<owner>/<repo>.git`
pub fn authenticated_url(
    server_url: &str,
    actor: &str,
    token: &Credential,
    repo: &RepoSlug,
) -> String {
    let server = server_url.trim_end_matches('/');
    let (scheme, host) = server.split_once("://").unwrap_or(("https", server));
    format!(
        "{scheme}://{actor}:{}@{host}/{}/{}.git",
        token.expose(),
        repo.owner,
        repo.name
    )
}

/// Clone `url` into `dest`. Any non-zero exit is [`PublishError::Clone`].
pub fn clone(
    runner: &dyn ProcessRunner,
    url: &str,
    dest: &Path,
    token: &Credential,
) -> Result<(), PublishError> {
    let invocation = Invocation::new("git")
        .arg("clone")
        .arg(url)
        .arg(dest.to_string_lossy())
        .redacting(token.expose());
    let exit = runner.run(&invocation)?;
    if !exit.is_success() {
        return Err(PublishError::Clone {
            code: exit.code,
            stderr: invocation.redact(exit.stderr.trim()),
        });
    }
    Ok(())
}

/// Check out the target branch inside the clone.
///
/// An existing branch is checked out under its remote spelling. A missing one
/// becomes an orphan branch whose index and working tree are emptied, so the
/// first artifact commit shares neither history nor files with the source.
pub fn checkout(
    runner: &dyn ProcessRunner,
    clone_dir: &Path,
    requested: &BranchName,
    state: &BranchState,
) -> Result<(), PublishError> {
    match state {
        BranchState::Existing { remote_name } => {
            runner.run_checked(&git(clone_dir).args(["checkout", remote_name.as_str()]))?;
        }
        BranchState::Missing => {
            runner.run_checked(&git(clone_dir).args([
                "checkout",
                "--orphan",
                requested.0.as_str(),
            ]))?;
            runner.run_checked(&git(clone_dir).args([
                "rm",
                "-r",
                "-f",
                "-q",
                "--ignore-unmatch",
                ".",
            ]))?;
        }
    }
    Ok(())
}

/// Stage everything in the clone.
pub fn stage_all(runner: &dyn ProcessRunner, clone_dir: &Path) -> Result<(), PublishError> {
    runner.run_checked(&git(clone_dir).args(["add", "."]))?;
    Ok(())
}

/// Commit the staged changes.
///
/// When the commit fails, the index is probed with `git diff --cached --quiet`:
/// a clean index means there was nothing to commit, anything else is
/// [`PublishError::CommitFailed`].
pub fn commit(
    runner: &dyn ProcessRunner,
    clone_dir: &Path,
    message: &str,
) -> Result<CommitOutcome, PublishError> {
    let exit = runner.run(&git(clone_dir).args(["commit", "-m", message]))?;
    if exit.is_success() {
        return Ok(CommitOutcome::Committed);
    }

    let probe = runner.run(&git(clone_dir).args(["diff", "--cached", "--quiet"]))?;
    if probe.is_success() {
        return Ok(CommitOutcome::NoChangesToCommit);
    }

    let reason = [exit.stderr.trim(), exit.stdout.trim()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("git commit exited non-zero")
        .to_string();
    Err(PublishError::CommitFailed { reason })
}

/// Push `HEAD` to `remote_branch` on `origin`.
pub fn push(
    runner: &dyn ProcessRunner,
    clone_dir: &Path,
    remote_branch: &str,
    token: &Credential,
) -> Result<(), PublishError> {
    runner.run_checked(
        &git(clone_dir)
            .args(["push", "origin"])
            .arg(format!("HEAD:{remote_branch}"))
            .redacting(token.expose()),
    )?;
    Ok(())
}
