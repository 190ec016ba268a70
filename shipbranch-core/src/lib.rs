//! shipbranch core library: run configuration, domain types, errors.
//!
//! Public API surface:
//! - [`types`]: newtypes and branch resolution
//! - [`config`]: [`Inputs`] → validated [`RunConfig`]
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{Inputs, PublishConfig, RunConfig};
pub use error::ConfigError;
pub use types::{BranchName, BranchState, Credential, GitIdentity, RepoSlug};
