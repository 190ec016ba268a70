//! TypeScript toolchain install and compile.

use std::path::Path;

use crate::error::PublishError;
use crate::process::{Invocation, ProcessRunner};

#[cfg(windows)]
const NPM: &str = "npm.cmd";
#[cfg(not(windows))]
const NPM: &str = "npm";

#[cfg(windows)]
const TSC: &str = "tsc.cmd";
#[cfg(not(windows))]
const TSC: &str = "tsc";

/// Install the compiler globally at `version`.
///
/// Safe to repeat; npm reinstalls over an existing global package.
pub fn install(runner: &dyn ProcessRunner, version: &str) -> Result<(), PublishError> {
    tracing::info!("Installing Typescript");
    runner.run_checked(&install_invocation(version))?;
    Ok(())
}

/// Compile the project rooted at `working_dir`.
///
/// A non-zero compiler exit is reported as [`PublishError::Build`].
pub fn compile(runner: &dyn ProcessRunner, working_dir: &Path) -> Result<(), PublishError> {
    tracing::info!("Building project");
    let exit = runner.run(&Invocation::new(TSC).cwd(working_dir))?;
    if !exit.is_success() {
        for line in exit.stdout.lines().chain(exit.stderr.lines()) {
            tracing::error!("{line}");
        }
        return Err(PublishError::Build { code: exit.code });
    }
    Ok(())
}

fn install_invocation(version: &str) -> Invocation {
    Invocation::new(NPM)
        .arg("install")
        .arg("--global")
        .arg(format!("typescript@{version}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::ScriptedRunner;

    #[test]
    fn install_pins_requested_version() {
        let inv = install_invocation("5.4.5");
        assert_eq!(inv.args, vec!["install", "--global", "typescript@5.4.5"]);
    }

    #[test]
    fn compile_runs_in_working_dir() {
        let runner = ScriptedRunner::new();
        compile(&runner, Path::new("/work/app")).expect("compile");
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].cwd.as_deref(), Some(Path::new("/work/app")));
    }

    #[test]
    fn compile_failure_is_build_error() {
        let runner = ScriptedRunner::new().fail_on(TSC, 2, "error TS2304");
        let err = compile(&runner, Path::new("/work/app")).unwrap_err();
        assert!(matches!(err, PublishError::Build { code: Some(2) }), "got: {err}");
    }

    #[test]
    fn install_failure_is_command_error() {
        let runner = ScriptedRunner::new().fail_on(NPM, 1, "EACCES");
        let err = install(&runner, "latest").unwrap_err();
        assert!(matches!(err, PublishError::Command { .. }), "got: {err}");
    }
}
