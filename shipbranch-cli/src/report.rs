//! Terminal reporting for a finished run.
//!
//! Under a GitHub Actions runner (`GITHUB_ACTIONS=true`) failures and the
//! no-op commit warning are also emitted as `::error::` / `::warning::`
//! workflow commands on stdout so they surface as annotations.

use colored::Colorize;

use shipbranch_publish::{CommitOutcome, PublishError, RunOutcome};

pub fn success(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Built => println!("{} build finished", "✓".green().bold()),
        RunOutcome::Published(report) => {
            println!(
                "{} published to '{}' ({} files copied)",
                "✓".green().bold(),
                report.remote_branch,
                report.files_copied
            );
            if report.commit == CommitOutcome::NoChangesToCommit && in_actions() {
                println!(
                    "{}",
                    workflow_command(
                        "warning",
                        "Couldn't commit new changes because there aren't any"
                    )
                );
            }
        }
    }
}

pub fn failure(err: &anyhow::Error) {
    let headline = headline(err);
    tracing::debug!("{err:#}");
    if in_actions() {
        println!("{}", workflow_command("error", &headline));
    }
    eprintln!("{} {headline}", "error:".red().bold());
}

/// The single human-readable line describing `err`.
fn headline(err: &anyhow::Error) -> String {
    err.downcast_ref::<PublishError>()
        .map(PublishError::headline)
        .unwrap_or_else(|| format!("Something went wrong: {err:#}"))
}

fn in_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

fn workflow_command(kind: &str, message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::{kind}::{escaped}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipbranch_core::ConfigError;

    #[test]
    fn workflow_command_escapes_data() {
        assert_eq!(
            workflow_command("error", "50% done\nnext"),
            "::error::50%25 done%0Anext"
        );
    }

    #[test]
    fn headline_uses_publish_error_message() {
        let err = anyhow::Error::from(PublishError::Build { code: Some(2) });
        assert_eq!(headline(&err), "Something went wrong while building.");

        let err = anyhow::Error::from(PublishError::from(ConfigError::MissingCredential));
        assert_eq!(headline(&err), shipbranch_core::error::MISSING_TOKEN_MESSAGE);
    }

    #[test]
    fn headline_falls_back_for_other_errors() {
        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(headline(&err), "Something went wrong: disk on fire");
    }
}
