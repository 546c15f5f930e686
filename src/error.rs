//! Error types for the abntgen library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ArticleError`] — **Fatal**: the operation cannot produce its artifacts
//!   (generator unreachable or unconfigured, artifact write failure, invalid
//!   configuration). Returned as `Err(ArticleError)` from the top-level
//!   `generate`/`compose` functions.
//!
//! * [`PersistError`] — **Non-fatal**: the artifact store could not record the
//!   run. Logged with `warn!` by the pipeline and surfaced through
//!   `GenerationStats::recorded`, never propagated — a missing database row
//!   must not cost the caller their documents.
//!
//! The segmentation core itself has no error type at all: an unmatched line
//! is "not a heading", malformed input degrades to placeholder output, and
//! that degradation is a quality issue for the reader, not an error for the
//! caller. Collaborator failures are never conflated with it.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the abntgen library.
#[derive(Debug, Error)]
pub enum ArticleError {
    // ── Request errors ────────────────────────────────────────────────────
    /// A mandatory request field was blank.
    #[error("Missing required field '{field}': title and topic must be non-empty")]
    InvalidRequest { field: &'static str },

    // ── Generator errors ──────────────────────────────────────────────────
    /// No generator injected and no API key available.
    #[error("Text generator is not configured.\n{hint}")]
    GeneratorNotConfigured { hint: String },

    /// The generation API returned a non-retryable error.
    #[error("Generator API error: {message}")]
    GeneratorApi { message: String },

    /// The generation call exceeded the configured timeout.
    #[error("Generator call timed out after {secs}s\nIncrease --api-timeout.")]
    GeneratorTimeout { secs: u64 },

    /// The generator answered with empty text after all retries.
    #[error("Generator produced empty text after {retries} retries")]
    GeneratorEmpty { retries: u32 },

    // ── Artifact errors ───────────────────────────────────────────────────
    /// Could not create the output directory or write an artifact file.
    #[error("Failed to write artifact '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF back-end rejected the instruction stream.
    #[error("PDF rendering failed: {detail}")]
    PdfRenderFailed { detail: String },

    /// The DOCX back-end could not pack the document.
    #[error("DOCX rendering failed: {detail}")]
    DocxRenderFailed { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal failure of the artifact store.
///
/// The pipeline logs these and carries on; callers who need to know inspect
/// `GenerationStats::recorded` or call the store directly.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Could not open (or initialise) the database file.
    #[error("failed to open artifact database '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A statement failed after the database was opened.
    #[error("artifact database statement failed: {0}")]
    Statement(#[from] rusqlite::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_names_the_field() {
        let e = ArticleError::InvalidRequest { field: "topic" };
        assert!(e.to_string().contains("'topic'"));
    }

    #[test]
    fn timeout_display_mentions_flag() {
        let e = ArticleError::GeneratorTimeout { secs: 60 };
        let msg = e.to_string();
        assert!(msg.contains("60s"), "got: {msg}");
        assert!(msg.contains("--api-timeout"));
    }

    #[test]
    fn write_failure_keeps_io_source() {
        use std::error::Error as _;
        let e = ArticleError::OutputWriteFailed {
            path: PathBuf::from("out/artigo.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("artigo.pdf"));
        assert!(e.source().is_some());
    }
}
