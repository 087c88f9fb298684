/// Title used for every protection notification issue.
pub const ISSUE_TITLE: &str = "Branch Protected";

/// Body of the notification issue, mentioning the user whose activity
/// created the branch.
pub fn branch_protected(user: &str, branch: &str) -> String {
    format!(
        "@{user} Default branch of {branch} has been protected from force pushing & deletion"
    )
}
