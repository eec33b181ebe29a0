//! Error kinds produced by the search core.
//!
//! None of these are fatal. Backend errors are absorbed by
//! [`SearchService`](crate::SearchService) into the scope's empty result,
//! manifest errors drop a single document from a collection digest.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a usable payload from the highlighting backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never completed: connection refused, DNS, reset, timeout.
    #[error("search backend unreachable: {0}")]
    Unreachable(String),

    /// The backend answered, but not with the expected JSON shape.
    #[error("malformed search backend response: {0}")]
    MalformedResponse(String),
}

impl BackendError {
    /// Stable kind name used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BackendError::Unreachable(_) => "BackendUnreachable",
            BackendError::MalformedResponse(_) => "BackendMalformedResponse",
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        BackendError::MalformedResponse(reason.into())
    }
}

/// Per-document failure while correlating snippets with a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("malformed manifest at {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    /// A page label that does not resolve to a canvas in the manifest.
    #[error("page '{page}' has no matching canvas: {reason}")]
    CanvasMismatch { page: String, reason: String },
}

impl ManifestError {
    pub fn kind(&self) -> &'static str {
        match self {
            ManifestError::NotFound { .. } => "ManifestNotFound",
            ManifestError::Malformed { .. } => "ManifestMalformed",
            ManifestError::CanvasMismatch { .. } => "CanvasMismatch",
        }
    }
}

/// Rejected search configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid search config: {0}")]
    Invalid(String),
}
