//! Recording fakes for the process and hosting-API seams (testing only).
//!
//! [`ScriptedRunner`] succeeds by default and records every invocation;
//! individual commands can be scripted to fail by command-line prefix.

use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use shipbranch_core::PublishConfig;

use crate::error::PublishError;
use crate::github::BranchLister;
use crate::process::{Exit, Invocation, ProcessRunner};

// ---------------------------------------------------------------------------
// ScriptedRunner
// ---------------------------------------------------------------------------

/// Process runner that never spawns anything.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    calls: Mutex<Vec<Invocation>>,
    scripted: Vec<(String, Exit)>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer invocations whose command line starts with `prefix` with `exit`.
    ///
    /// The first matching rule wins.
    pub fn respond(mut self, prefix: &str, exit: Exit) -> Self {
        self.scripted.push((prefix.to_string(), exit));
        self
    }

    /// Shorthand for a non-zero exit with `stderr`.
    pub fn fail_on(self, prefix: &str, code: i32, stderr: &str) -> Self {
        self.respond(prefix, Exit::failure(code, stderr))
    }

    /// Every invocation seen so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Unredacted command lines of every invocation, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::command_line).collect()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<Exit, PublishError> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(invocation.clone());

        let line = invocation.command_line();
        let exit = self
            .scripted
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, exit)| exit.clone())
            .unwrap_or_else(Exit::success);

        // A successful clone leaves its destination directory behind.
        let is_clone = invocation.program == "git"
            && invocation.args.first().map(String::as_str) == Some("clone");
        if exit.is_success() && is_clone {
            if let Some(dest) = invocation.args.last() {
                let dest = PathBuf::from(dest);
                fs::create_dir_all(&dest).map_err(|e| crate::error::io_err(&dest, e))?;
            }
        }

        Ok(exit)
    }
}

// ---------------------------------------------------------------------------
// StaticBranches
// ---------------------------------------------------------------------------

/// Branch lister returning a fixed list, or a fixed API failure.
#[derive(Debug, Default)]
pub struct StaticBranches {
    names: Vec<String>,
    failure: Option<String>,
    requests: Mutex<usize>,
}

impl StaticBranches {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Number of listing requests made.
    pub fn requests(&self) -> usize {
        *self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BranchLister for StaticBranches {
    fn list_branches(&self, _target: &PublishConfig) -> Result<Vec<String>, PublishError> {
        *self.requests.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        match &self.failure {
            Some(message) => Err(PublishError::Api(message.clone())),
            None => Ok(self.names.clone()),
        }
    }
}
