use thiserror::Error;

/// Failures that abort a reconciliation step or a whole polling cycle.
#[derive(Debug, Error)]
pub enum WardenError {
    /// An event payload did not decode into the expected ref shape.
    #[error("malformed event payload for {repo}: {source}")]
    MalformedPayload {
        repo: String,
        #[source]
        source: serde_json::Error,
    },
    /// A repository full name that does not split into `owner/name`.
    #[error("unable to determine repository name from {0:?}")]
    InvalidRepositoryName(String),
    /// Any failure from the GitHub API surface.
    #[error(transparent)]
    Api(#[from] anyhow::Error),
}
