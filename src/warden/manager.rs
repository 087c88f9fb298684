use std::time::Duration;

use clap::ValueEnum;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::github::GithubApi;
use crate::repository::Repository;
use crate::warden::errors::WardenError;
use crate::warden::events::{self, BranchRefEvent};
use crate::warden::messages;

/// Delay before the first in-cycle retry; doubles on every further attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_secs(2);

/// What happens to the rest of a cycle when a single event fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ErrorPolicy {
    /// Abort the cycle on the first failing event
    FailFast,
    /// Log failing events and keep processing the rest of the page
    BestEffort,
}

pub struct WardenConfig {
    pub org: String,
    pub interval: Duration,
    pub error_policy: ErrorPolicy,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
}

impl WardenConfig {
    pub fn new(
        org: String,
        interval_secs: u64,
        error_policy: ErrorPolicy,
        max_retries: u32,
    ) -> Self {
        Self {
            org,
            interval: Duration::from_secs(interval_secs),
            error_policy,
            max_retries,
            retry_base_delay: RETRY_BASE_DELAY,
        }
    }
}

/// Outcome of reconciling a single branch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Protection {
    AlreadyProtected,
    Applied,
}

/// Drives the observe-and-remediate cycle against the organization feed.
pub struct Warden<G> {
    github: G,
    config: WardenConfig,
}

impl<G: GithubApi> Warden<G> {
    pub fn new(github: G, config: WardenConfig) -> Self {
        Self { github, config }
    }

    /// Polls and reconciles forever. Returns only the error of a cycle
    /// that kept failing after all retries.
    pub async fn run(&self) -> Result<(), WardenError> {
        info!(
            "Watching organization {} every {}s",
            self.config.org,
            self.config.interval.as_secs()
        );

        loop {
            self.cycle_with_retry().await?;
            sleep(self.config.interval).await;
        }
    }

    async fn cycle_with_retry(&self) -> Result<(), WardenError> {
        let mut delay = self.config.retry_base_delay;
        let mut attempt = 0;

        loop {
            match self.cycle().await {
                Ok(()) => return Ok(()),
                Err(err) if attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(
                        "Cycle failed ({err}), retry {attempt}/{} in {:?}",
                        self.config.max_retries, delay
                    );
                    sleep(delay).await;
                    delay *= 2;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One full pass: fetch a page of the feed, extract branch events and
    /// reconcile them in page order.
    async fn cycle(&self) -> Result<(), WardenError> {
        let page = self.github.org_events(&self.config.org).await?;
        let events = events::extract_branch_events(page)?;

        if events.is_empty() {
            return Ok(());
        }
        info!("Found {} branch events to reconcile", events.len());

        let mut failures = 0usize;
        for event in &events {
            if let Err(err) = self.reconcile(event).await {
                match self.config.error_policy {
                    ErrorPolicy::FailFast => return Err(err),
                    ErrorPolicy::BestEffort => {
                        error!("{}: {err}", event.repo);
                        failures += 1;
                    }
                }
            }
        }

        if failures > 0 {
            warn!(
                "{failures} of {} branch events failed this cycle",
                events.len()
            );
        }

        Ok(())
    }

    async fn reconcile(&self, event: &BranchRefEvent) -> Result<Protection, WardenError> {
        let repo = Repository::parse(&event.repo)
            .ok_or_else(|| WardenError::InvalidRepositoryName(event.repo.clone()))?;

        info!(
            "{}: ref {} created by {}, default branch {}",
            repo, event.git_ref, event.actor, event.default_branch
        );

        match self.ensure_protected(&repo, &event.default_branch).await? {
            Protection::AlreadyProtected => {
                info!("{}: branch {} already protected", repo, event.default_branch);
                Ok(Protection::AlreadyProtected)
            }
            Protection::Applied => {
                info!("{}: branch {} protected", repo, event.default_branch);
                self.notify(&repo, &event.default_branch, &event.actor)
                    .await?;
                info!("{}: issue created for {}", repo, event.actor);
                Ok(Protection::Applied)
            }
        }
    }

    /// Queries protection for the branch and applies the fixed policy when
    /// none exists. Idempotent: a protected branch is left untouched.
    async fn ensure_protected(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> Result<Protection, WardenError> {
        if let Some(rule) = self.github.branch_protection(repo, branch).await? {
            let force_pushes = rule.allow_force_pushes.is_some_and(|f| f.enabled);
            let deletions = rule.allow_deletions.is_some_and(|f| f.enabled);
            debug!(
                "{repo}: existing rule on {branch} (allow_force_pushes={force_pushes}, allow_deletions={deletions})"
            );
            return Ok(Protection::AlreadyProtected);
        }

        self.github.protect_branch(repo, branch).await?;
        Ok(Protection::Applied)
    }

    async fn notify(
        &self,
        repo: &Repository,
        branch: &str,
        actor: &str,
    ) -> Result<(), WardenError> {
        let body = messages::branch_protected(actor, branch);
        self.github
            .create_issue(repo, messages::ISSUE_TITLE, &body, actor)
            .await?;
        Ok(())
    }
}
