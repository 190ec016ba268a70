//! Run configuration.
//!
//! Raw inputs arrive as optional strings (from flags or the `INPUT_*` /
//! `GITHUB_*` environment). [`RunConfig::from_inputs`] validates them once,
//! up front; the result is immutable for the rest of the run.
//!
//! Publishing is modelled as `Option<PublishConfig>`: when it is `Some`, a
//! token, branch, repository, actor and commit identifier are all present.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::types::{BranchName, Credential, GitIdentity, RepoSlug};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_SERVER_URL: &str = "https://github.com";
pub const DEFAULT_TYPESCRIPT_VERSION: &str = "latest";

/// Unvalidated inputs for one invocation.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub push_to_branch: Option<String>,
    pub branch: Option<String>,
    pub token: Option<String>,
    pub clean_sources: Option<String>,
    pub typescript_version: Option<String>,
    pub working_dir: PathBuf,
    /// Directory the `branch-<name>` clone is created in (normally the process cwd).
    pub clone_parent: PathBuf,
    pub repository: Option<String>,
    pub actor: Option<String>,
    pub sha: Option<String>,
    pub api_url: Option<String>,
    pub server_url: Option<String>,
}

/// Parameters of the publish half of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    pub branch: BranchName,
    pub token: Credential,
    pub repository: RepoSlug,
    pub actor: String,
    pub sha: String,
    pub identity: GitIdentity,
    pub clean_sources: bool,
    pub clone_parent: PathBuf,
    pub api_url: String,
    pub server_url: String,
}

impl PublishConfig {
    /// `<clone_parent>/branch-<name>`
    pub fn clone_dir(&self) -> PathBuf {
        self.clone_parent.join(self.branch.clone_dir_name())
    }
}

/// One invocation's parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub working_dir: PathBuf,
    pub typescript_version: String,
    /// `None` when pushing is disabled; the run stops after a successful build.
    pub publish: Option<PublishConfig>,
}

impl RunConfig {
    pub fn push_enabled(&self) -> bool {
        self.publish.is_some()
    }

    /// Validate raw inputs.
    ///
    /// Only `pushToBranch` is read before the token: once publishing is
    /// requested, a missing secret is reported with its dedicated message
    /// whatever else is missing or malformed.
    pub fn from_inputs(inputs: Inputs) -> Result<Self, ConfigError> {
        let push = parse_flag("pushToBranch", inputs.push_to_branch.as_deref())?;
        let token = if push {
            Some(non_empty(inputs.token).ok_or(ConfigError::MissingCredential)?)
        } else {
            None
        };
        let clean_sources = parse_flag("cleanSources", inputs.clean_sources.as_deref())?;
        let typescript_version = non_empty(inputs.typescript_version)
            .unwrap_or_else(|| DEFAULT_TYPESCRIPT_VERSION.to_string());

        let publish = if let Some(token) = token {
            let branch = non_empty(inputs.branch)
                .ok_or(ConfigError::MissingInput { input: "branch" })?;
            let repository: RepoSlug = non_empty(inputs.repository)
                .ok_or(ConfigError::MissingInput { input: "GITHUB_REPOSITORY" })?
                .parse()?;
            let actor = non_empty(inputs.actor)
                .ok_or(ConfigError::MissingInput { input: "GITHUB_ACTOR" })?;
            let sha = non_empty(inputs.sha).ok_or(ConfigError::MissingInput { input: "GITHUB_SHA" })?;

            Some(PublishConfig {
                branch: BranchName::from(branch),
                token: Credential::new(token),
                repository,
                actor,
                sha,
                identity: GitIdentity::default(),
                clean_sources,
                clone_parent: inputs.clone_parent,
                api_url: trim_url(non_empty(inputs.api_url), DEFAULT_API_URL),
                server_url: trim_url(non_empty(inputs.server_url), DEFAULT_SERVER_URL),
            })
        } else {
            None
        };

        Ok(Self {
            working_dir: inputs.working_dir,
            typescript_version,
            publish,
        })
    }
}

/// Interpret a boolean-like input. Absent or blank means `false`.
pub fn parse_flag(input: &'static str, raw: Option<&str>) -> Result<bool, ConfigError> {
    let Some(raw) = raw else { return Ok(false) };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "off" | "0" => Ok(false),
        "true" | "yes" | "on" | "1" => Ok(true),
        _ => Err(ConfigError::InvalidFlag {
            input,
            value: raw.to_string(),
        }),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn trim_url(value: Option<String>, default: &str) -> String {
    value
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}
