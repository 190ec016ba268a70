//! Error types for shipbranch-core.

use thiserror::Error;

/// Fixed message for a publish request without a token.
pub const MISSING_TOKEN_MESSAGE: &str = "A GitHub secret token is a required input for pushing code (hint: use ${{ secrets.GITHUB_TOKEN }} )";

/// Invalid or incomplete run inputs. Raised before any external call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Publishing was requested but no token was supplied.
    #[error("{}", MISSING_TOKEN_MESSAGE)]
    MissingCredential,

    /// A value required for publishing was absent or empty.
    #[error("'{input}' is a required input for pushing code")]
    MissingInput { input: &'static str },

    /// A boolean-like input could not be interpreted.
    #[error("invalid value '{value}' for '{input}'; expected true or false")]
    InvalidFlag { input: &'static str, value: String },

    /// `GITHUB_REPOSITORY`-style coordinates were not `owner/name`.
    #[error("invalid repository '{0}'; expected owner/name")]
    InvalidRepository(String),
}
