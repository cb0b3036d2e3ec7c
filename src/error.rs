//! Error taxonomy exposed to callers of the analytics core.

use thiserror::Error;

/// Failures surfaced by the analytics pipeline.
///
/// None of these are retried by the core; reconnect/retry policy belongs to
/// the transport and UI layers.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A storage read failed or the backing store is unreachable. Non-fatal:
    /// the current request aborts and the UI shows a message.
    #[error("study data unavailable: {0}")]
    DataUnavailable(String),

    /// Malformed user input (custom date, out-of-range counts). The dialog
    /// layer re-prompts; storage is never touched.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A report generator rejected its input. Should not happen for
    /// well-formed records; treated as a programming defect and propagated.
    #[error("report rendering failed: {0}")]
    Render(String),
}

impl CoreError {
    pub fn data_unavailable(err: impl std::fmt::Display) -> Self {
        CoreError::DataUnavailable(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
