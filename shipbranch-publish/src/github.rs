//! Hosting API client: branch listing.

use serde::Deserialize;

use shipbranch_core::{PublishConfig, RepoSlug};

use crate::error::PublishError;

/// Page size requested from the branches endpoint (the API maximum).
pub const PER_PAGE: usize = 100;

const USER_AGENT: &str = concat!("shipbranch/", env!("CARGO_PKG_VERSION"));

/// Lists the branch names of the publish target's repository.
pub trait BranchLister {
    fn list_branches(&self, target: &PublishConfig) -> Result<Vec<String>, PublishError>;
}

#[derive(Debug, Deserialize)]
struct BranchRecord {
    name: String,
}

/// REST client for `GET /repos/{owner}/{repo}/branches`.
pub struct GitHubApi {
    agent: ureq::Agent,
}

impl GitHubApi {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().user_agent(USER_AGENT).build(),
        }
    }

    fn fetch_page(
        &self,
        target: &PublishConfig,
        page: usize,
    ) -> Result<Vec<BranchRecord>, PublishError> {
        let url = branches_url(&target.api_url, &target.repository);
        let response = self
            .agent
            .get(&url)
            .query("per_page", &PER_PAGE.to_string())
            .query("page", &page.to_string())
            .set("Accept", "application/vnd.github+json")
            .set(
                "Authorization",
                &format!("Bearer {}", target.token.expose()),
            )
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(code, response) => PublishError::Api(format!(
                    "{url} returned {code} {}",
                    response.status_text()
                )),
                ureq::Error::Transport(transport) => {
                    PublishError::Api(format!("{url}: {transport}"))
                }
            })?;

        response
            .into_json()
            .map_err(|e| PublishError::Api(format!("unexpected branch listing from {url}: {e}")))
    }
}

impl Default for GitHubApi {
    fn default() -> Self {
        Self::new()
    }
}

impl BranchLister for GitHubApi {
    /// Follows pages until a short page comes back.
    fn list_branches(&self, target: &PublishConfig) -> Result<Vec<String>, PublishError> {
        let mut names = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.fetch_page(target, page)?;
            let full = batch.len() >= PER_PAGE;
            names.extend(batch.into_iter().map(|b| b.name));
            if !full {
                break;
            }
            page += 1;
        }
        tracing::debug!(count = names.len(), repository = %target.repository, "listed branches");
        Ok(names)
    }
}

/// `<api>/repos/<owner>/<name>/branches`
pub fn branches_url(api_url: &str, repo: &RepoSlug) -> String {
    format!(
        "{}/repos/{}/{}/branches",
        api_url.trim_end_matches('/'),
        repo.owner,
        repo.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branches_url_trims_trailing_slash() {
        let repo: RepoSlug = "octo/widgets".parse().unwrap();
        assert_eq!(
            branches_url("https://api.github.com/", &repo),
            "https://api.github.com/repos/octo/widgets/branches"
        );
    }
}
