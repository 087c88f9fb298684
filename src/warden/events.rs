use std::collections::HashSet;

use tracing::debug;

use crate::github::types::{OrgEvent, RefPayload};
use crate::warden::errors::WardenError;

/// A ref-creating activity event, reduced to the fields the warden acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRefEvent {
    /// Repository full name in `owner/name` form, unvalidated at this
    /// layer.
    pub repo: String,
    /// Login of the user whose activity produced the event.
    pub actor: String,
    /// The git ref named by the event payload.
    pub git_ref: String,
    /// Default branch of the repository at event time. May be empty when
    /// the payload carried no `master_branch`.
    pub default_branch: String,
}

/// Reduces one page of the activity feed to its ref-bearing events, one
/// per repository.
///
/// Events without a payload, or whose payload names no ref, are non-branch
/// activity and are dropped. A payload that fails to decode aborts the
/// whole call; no partial list is returned. Deduplication is page-local:
/// the first qualifying event per repository wins, and the output keeps
/// first-occurrence order.
pub fn extract_branch_events(page: Vec<OrgEvent>) -> Result<Vec<BranchRefEvent>, WardenError> {
    let mut seen = HashSet::new();
    let mut events = Vec::new();

    for event in page {
        let repo = event.repo.name;

        let Some(payload) = event.payload else {
            continue;
        };
        if payload.is_null() {
            continue;
        }

        let payload: RefPayload =
            serde_json::from_value(payload).map_err(|source| WardenError::MalformedPayload {
                repo: repo.clone(),
                source,
            })?;

        let Some(git_ref) = payload.git_ref.filter(|r| !r.is_empty()) else {
            continue;
        };

        if !seen.insert(repo.clone()) {
            debug!("Skipping duplicate event for {repo}");
            continue;
        }

        events.push(BranchRefEvent {
            repo,
            actor: event.actor.login,
            git_ref,
            default_branch: payload.master_branch.unwrap_or_default(),
        });
    }

    Ok(events)
}
