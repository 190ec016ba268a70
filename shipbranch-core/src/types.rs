//! Domain types for a build-and-publish run.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Name of the branch compiled artifacts are published to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(pub String);

impl BranchName {
    /// Case-insensitive comparison against a branch name reported by the host.
    ///
    /// Both sides are lowercased, so `Release` matches `release` and `RELEASE`.
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.to_lowercase()
    }

    /// Local directory the branch is cloned into: `branch-<name>`.
    pub fn clone_dir_name(&self) -> String {
        format!("branch-{}", self.0)
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for BranchName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BranchName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Secret access token. Never printed by `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for embedding into URLs and request headers only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// `owner/name` coordinates of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoSlug {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidRepository(s.to_string());
        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Commit author identity configured before cloning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

impl Default for GitIdentity {
    fn default() -> Self {
        Self {
            name: "actions-user".to_string(),
            email: "action@github.com".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Branch resolution
// ---------------------------------------------------------------------------

/// Disposition of the target branch on the remote.
///
/// Picks exactly one checkout strategy: attach to the existing branch, or
/// create an orphan branch with no shared history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchState {
    /// The branch exists; `remote_name` is its spelling on the remote.
    Existing { remote_name: String },
    /// No listed branch matches; an orphan branch will be created.
    Missing,
}

impl BranchState {
    /// Resolve `requested` against the names listed by the host.
    pub fn resolve<'a, I>(requested: &BranchName, listed: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        listed
            .into_iter()
            .find(|name| requested.matches(name))
            .map(|name| BranchState::Existing {
                remote_name: name.to_string(),
            })
            .unwrap_or(BranchState::Missing)
    }

    pub fn exists(&self) -> bool {
        matches!(self, BranchState::Existing { .. })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
