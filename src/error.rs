//! Error types for the slipscan library.
//!
//! The taxonomy follows the pipeline's failure points, not the transport:
//!
//! * [`ExtractError::DecodeFailure`] — the upload could not be rasterised
//!   into at least one page.
//! * [`ExtractError::InferenceFailure`] — the backend call failed for any
//!   transport, authentication, or model reason. Never retried.
//! * [`ExtractError::Internal`] — anything else (encoding glitch, panicked
//!   blocking task).
//!
//! A reply that parses but contains no recoverable weight is deliberately
//! *not* an error — it is the `NotFound` terminal state of
//! [`crate::pipeline::interpret::WeightOutcome`], surfaced to callers as a
//! `null` value. The HTTP layer flattens every `ExtractError` into one fixed
//! per-endpoint message, so each variant here carries the full diagnostic
//! detail for logging before that flattening happens.

use thiserror::Error;

/// All errors returned by the slipscan extraction pipeline.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Document errors ───────────────────────────────────────────────────
    /// The uploaded bytes could not be opened as a PDF.
    #[error("PDF decode failed: {detail}")]
    DecodeFailure { detail: String },

    /// The PDF opened but contains no pages to rasterise.
    #[error("PDF decode failed: document has no pages")]
    EmptyDocument,

    /// pdfium returned an error while rendering the first page.
    #[error("Rasterisation failed: {detail}")]
    RasterisationFailed { detail: String },

    // ── Inference errors ──────────────────────────────────────────────────
    /// The inference backend call failed (transport, auth, or model error).
    #[error("Inference backend error: {detail}")]
    InferenceFailure { detail: String },

    /// The backend replied 200 but the body had no usable completion.
    #[error("Inference backend returned an empty reply")]
    EmptyReply,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExtractError {
    /// True when the failure happened before any backend call was issued.
    ///
    /// Used by tests to assert that a corrupt upload never reaches the
    /// network stage.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            ExtractError::DecodeFailure { .. }
                | ExtractError::EmptyDocument
                | ExtractError::RasterisationFailed { .. }
        )
    }
}
