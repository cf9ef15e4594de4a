use std::path::PathBuf;
use thiserror::Error;

use crate::core::flavor::BuildFlavor;

/// Central error type for version discovery and artifact downloads.
/// Every module returns `Result<T, ArtifactError>`.
#[derive(Debug, Error)]
pub enum ArtifactError {
    // ── Catalog ─────────────────────────────────────────
    #[error("Upstream index unavailable at {url}: {reason}")]
    UpstreamUnavailable { url: String, reason: String },

    #[error("Version {version} is not available for {flavor}")]
    VersionNotFound { flavor: BuildFlavor, version: String },

    #[error("Unknown build flavor: {0}")]
    UnknownFlavor(String),

    #[error("No download URL found for {flavor} {version}")]
    NoDownloadUrl { flavor: BuildFlavor, version: String },

    // ── Integrity ───────────────────────────────────────
    #[error("Downloaded artifact not found at {path:?}")]
    MissingArtifact { path: PathBuf },

    #[error("Size mismatch for {path:?}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Config ──────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type ArtifactResult<T> = Result<T, ArtifactError>;

impl ArtifactError {
    /// True for the post-download verification failures (missing file,
    /// wrong size, wrong hash).
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            ArtifactError::MissingArtifact { .. }
                | ArtifactError::SizeMismatch { .. }
                | ArtifactError::Sha1Mismatch { .. }
        )
    }

    pub(crate) fn upstream(url: &str, reason: impl ToString) -> Self {
        ArtifactError::UpstreamUnavailable {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArtifactError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<std::io::Error> for ArtifactError {
    fn from(source: std::io::Error) -> Self {
        ArtifactError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
