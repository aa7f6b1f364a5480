// ── Core error types ──
//
// Every fetch failure collapses into one user-facing message. The
// transport-level classification survives only for diagnostics.

use flagdex_api::FetchFailureKind;
use thiserror::Error;

/// The message shown whenever the directory cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load countries. Please try again later.";

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("directory fetch failed ({kind}): {detail}")]
    Fetch {
        kind: FetchFailureKind,
        /// HTTP status code (if the endpoint answered).
        status: Option<u16>,
        detail: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The single message the directory shows for any load failure.
    pub fn user_message(&self) -> &'static str {
        LOAD_FAILED_MESSAGE
    }
}

impl From<flagdex_api::Error> for CoreError {
    fn from(err: flagdex_api::Error) -> Self {
        Self::Fetch {
            kind: err.kind(),
            status: err.status(),
            detail: err.to_string(),
        }
    }
}
