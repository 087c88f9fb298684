use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::repository::Repository;

pub mod types;

use types::{BranchProtection, ListOptions, OrgEvent, ProtectionRequest};

/// How many events one polling cycle looks at. The feed itself is bounded
/// by the platform's pagination window, so a single page is enough.
const EVENTS_PAGE_SIZE: u8 = 30;

/// The slice of the GitHub API the warden drives.
///
/// Kept as a trait so the reconciliation loop can run against a recording
/// fake in tests; [`Github`] is the octocrab-backed implementation.
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// Lists one page of the organization's activity feed, most recent
    /// first.
    async fn org_events(&self, org: &str) -> Result<Vec<OrgEvent>>;

    /// Queries the protection rule of a branch. `Ok(None)` means the
    /// branch exists but carries no protection.
    async fn branch_protection(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> Result<Option<BranchProtection>>;

    /// Applies the fixed protection policy to a branch.
    async fn protect_branch(&self, repo: &Repository, branch: &str) -> Result<()>;

    /// Opens an issue assigned to `assignee`.
    async fn create_issue(
        &self,
        repo: &Repository,
        title: &str,
        body: &str,
        assignee: &str,
    ) -> Result<()>;
}

pub struct Github {
    client: octocrab::Octocrab,
}

impl Github {
    pub fn new(token: &str) -> Result<Self> {
        let client = octocrab::Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(|e| anyhow!("Failed to create GitHub client: {}", e))?;

        Ok(Self { client })
    }

    fn protection_route(repo: &Repository, branch: &str) -> String {
        format!(
            "/repos/{}/{}/branches/{}/protection",
            repo.owner(),
            repo.name(),
            branch
        )
    }
}

#[async_trait]
impl GithubApi for Github {
    async fn org_events(&self, org: &str) -> Result<Vec<OrgEvent>> {
        let route = format!("/orgs/{org}/events");
        let options = ListOptions {
            per_page: EVENTS_PAGE_SIZE,
            page: 1,
        };

        let events: Vec<OrgEvent> = self
            .client
            .get(route, Some(&options))
            .await
            .map_err(|e| anyhow!("Failed to list events for organization {}: {}", org, e))?;

        Ok(events)
    }

    async fn branch_protection(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> Result<Option<BranchProtection>> {
        let result: Result<BranchProtection, octocrab::Error> = self
            .client
            .get(Self::protection_route(repo, branch), None::<&()>)
            .await;

        match result {
            Ok(protection) => Ok(Some(protection)),
            // The protection endpoint answers 404 for an unprotected
            // branch instead of returning an empty rule.
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code == 404 => Ok(None),
            Err(e) => Err(anyhow!(
                "Failed to query protection of branch {} in {}: {}",
                branch,
                repo,
                e
            )),
        }
    }

    async fn protect_branch(&self, repo: &Repository, branch: &str) -> Result<()> {
        let request = ProtectionRequest::deny_force_push_and_deletion();

        let _: BranchProtection = self
            .client
            .put(Self::protection_route(repo, branch), Some(&request))
            .await
            .map_err(|e| anyhow!("Failed to protect branch {} in {}: {}", branch, repo, e))?;

        Ok(())
    }

    async fn create_issue(
        &self,
        repo: &Repository,
        title: &str,
        body: &str,
        assignee: &str,
    ) -> Result<()> {
        self.client
            .issues(repo.owner(), repo.name())
            .create(title)
            .body(body)
            .assignees(vec![assignee.to_string()])
            .send()
            .await
            .map_err(|e| anyhow!("Failed to create issue in {}: {}", repo, e))?;

        Ok(())
    }
}
