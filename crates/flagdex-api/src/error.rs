use strum::Display;
use thiserror::Error;

/// Top-level error type for the `flagdex-api` crate.
///
/// Covers every way a directory fetch or flag probe can fail.
/// `flagdex-core` collapses these into a single user-facing state but
/// keeps the [`FetchFailureKind`] around for diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, reset, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── HTTP ────────────────────────────────────────────────────────
    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}: {body_preview}")]
    HttpStatus { status: u16, body_preview: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The body was not a JSON array, with the raw body for debugging.
    #[error("Decode error: {message}")]
    Decode { message: String, body: String },
}

/// Coarse classification of a failed fetch, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FetchFailureKind {
    Transport,
    HttpStatus,
    Decode,
}

impl Error {
    /// Which of the three failure families this error belongs to.
    pub fn kind(&self) -> FetchFailureKind {
        match self {
            Self::Transport(_) | Self::InvalidUrl(_) | Self::ClientBuild(_) => {
                FetchFailureKind::Transport
            }
            Self::HttpStatus { .. } => FetchFailureKind::HttpStatus,
            Self::Decode { .. } => FetchFailureKind::Decode,
        }
    }

    /// HTTP status code, when the endpoint answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
