use clap::Parser;

use crate::warden::manager::ErrorPolicy;

/// Watches an organization's activity feed and locks down the default
/// branch of newly created repositories.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Personal access token used to authenticate against the GitHub API
    #[arg(long, env("GITHUB_TOKEN"))]
    pub token: String,
    /// Organization whose activity feed is watched
    #[arg(long, env("GITHUB_ORG"))]
    pub org: String,
    /// Seconds to pause between polling cycles
    #[arg(long, default_value_t = 60, env("POLL_INTERVAL_SECS"))]
    pub interval: u64,
    /// What happens to the rest of a cycle when a single event fails
    #[arg(long, value_enum, default_value = "fail-fast", env("ERROR_POLICY"))]
    pub error_policy: ErrorPolicy,
    /// Extra attempts for a failed cycle before the failure becomes fatal
    #[arg(long, default_value_t = 3, env("MAX_RETRIES"))]
    pub max_retries: u32,
}
