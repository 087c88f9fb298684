//! Partial wire models for the GitHub endpoints octocrab does not type.
//!
//! Only the fields the warden reads are declared; everything else in the
//! responses is ignored.

use serde::{Deserialize, Serialize};

/// Actor record attached to an activity event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventActor {
    /// The user's handle.
    pub login: String,
}

/// Repository record attached to an activity event. Unlike the repository
/// endpoints, the feed reports `name` in full `owner/name` form.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRepository {
    pub name: String,
}

/// One entry of an organization activity feed.
///
/// The payload shape varies per event type, so it is carried as raw JSON
/// until the extractor decides whether the event is ref-bearing.
#[derive(Debug, Clone, Deserialize)]
pub struct OrgEvent {
    pub actor: EventActor,
    pub repo: EventRepository,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// The ref-bearing slice of an event payload. Both fields are optional:
/// their absence is what distinguishes non-branch activity.
#[derive(Debug, Clone, Deserialize)]
pub struct RefPayload {
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub master_branch: Option<String>,
}

/// Query-string options for paginated list endpoints.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ListOptions {
    pub per_page: u8,
    pub page: u32,
}

/// Body of a branch protection update.
///
/// The endpoint requires the four unused rule groups to be present as
/// explicit `null`s, so they are kept as always-`None` fields rather than
/// skipped during serialization.
#[derive(Debug, Clone, Serialize)]
pub struct ProtectionRequest {
    pub required_status_checks: Option<serde_json::Value>,
    pub enforce_admins: Option<bool>,
    pub required_pull_request_reviews: Option<serde_json::Value>,
    pub restrictions: Option<serde_json::Value>,
    pub allow_force_pushes: bool,
    pub allow_deletions: bool,
}

impl ProtectionRequest {
    /// The one policy the warden applies: no force pushes, no deletions.
    pub fn deny_force_push_and_deletion() -> Self {
        Self {
            required_status_checks: None,
            enforce_admins: None,
            required_pull_request_reviews: None,
            restrictions: None,
            allow_force_pushes: false,
            allow_deletions: false,
        }
    }
}

/// Partial view of an existing branch protection rule.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchProtection {
    #[serde(default)]
    pub allow_force_pushes: Option<ProtectionFlag>,
    #[serde(default)]
    pub allow_deletions: Option<ProtectionFlag>,
}

/// The `{"enabled": bool}` wrapper the protection endpoint uses for its
/// boolean settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtectionFlag {
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn org_event_decodes_with_and_without_payload() {
        let event: OrgEvent = serde_json::from_value(json!({
            "type": "CreateEvent",
            "actor": { "id": 1, "login": "alice" },
            "repo": { "id": 2, "name": "acme/widgets" },
            "payload": { "ref": "main", "ref_type": "branch", "master_branch": "main" }
        }))
        .unwrap();
        assert_eq!(event.actor.login, "alice");
        assert_eq!(event.repo.name, "acme/widgets");
        assert!(event.payload.is_some());

        let bare: OrgEvent = serde_json::from_value(json!({
            "actor": { "login": "bob" },
            "repo": { "name": "acme/tools" }
        }))
        .unwrap();
        assert!(bare.payload.is_none());
    }

    #[test]
    fn ref_payload_tolerates_missing_fields() {
        let payload: RefPayload = serde_json::from_value(json!({ "action": "opened" })).unwrap();
        assert!(payload.git_ref.is_none());
        assert!(payload.master_branch.is_none());
    }

    #[test]
    fn protection_request_serializes_unused_groups_as_null() {
        let body =
            serde_json::to_value(ProtectionRequest::deny_force_push_and_deletion()).unwrap();
        assert_eq!(
            body,
            json!({
                "required_status_checks": null,
                "enforce_admins": null,
                "required_pull_request_reviews": null,
                "restrictions": null,
                "allow_force_pushes": false,
                "allow_deletions": false
            })
        );
    }

    #[test]
    fn branch_protection_decodes_enabled_flags() {
        let protection: BranchProtection = serde_json::from_value(json!({
            "url": "https://api.github.com/repos/acme/widgets/branches/main/protection",
            "allow_force_pushes": { "enabled": false },
            "allow_deletions": { "enabled": false }
        }))
        .unwrap();
        assert!(!protection.allow_force_pushes.unwrap().enabled);
        assert!(!protection.allow_deletions.unwrap().enabled);
    }
}
