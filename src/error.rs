//! Error types for dependamerge

use thiserror::Error;

/// Unified error type for dependamerge operations
#[derive(Debug, Error)]
pub enum Error {
    /// A version string did not match the `MAJOR.MINOR.PATCH` format
    #[error("invalid version string: {0:?} (expected MAJOR.MINOR.PATCH)")]
    VersionFormat(String),

    /// GitHub API returned an error or could not be reached
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Error from the octocrab client
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Generic platform error (used by test doubles and non-GitHub failures)
    #[error("platform error: {0}")]
    Platform(String),

    /// Upstream response was missing an expected field or had an unexpected shape
    ///
    /// This indicates an API contract break and is fatal for the current
    /// PR evaluation rather than being defaulted away.
    #[error("unexpected API response: {0}")]
    UnexpectedResponse(String),

    /// Posting the approval review failed with a non-2xx status
    ///
    /// Distinct from a policy rejection: the tool decided to approve and the
    /// approval itself could not be recorded.
    #[error("failed to post approval review for PR #{number}: HTTP {status}")]
    ApprovalFailed {
        /// PR number the approval was for
        number: u64,
        /// HTTP status returned by the review endpoint
        status: u16,
    },

    /// Local settings file missing, unreadable, or invalid
    #[error("settings error: {0}")]
    Settings(String),

    /// No GitHub token could be resolved
    #[error("authentication error: {0}")]
    Auth(String),

    /// Internal invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience result alias
pub type Result<T> = std::result::Result<T, Error>;
