// ─────────────────────────────────────────────────────────────────────
// Optima Kernel — Error Hierarchy
// Mirrors: pycqed/analysis_v2/fluxing_analysis.py
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all Optima Kernel failures.
///
/// An exhausted tolerance ladder is not an error: it yields an empty
/// [`RankedResult`](crate::RankedResult).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimaError {
    /// Invalid input arrays or parameters; raised before any computation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// An external collaborator (interpolator, waveform generator) failed.
    #[error("collaborator error: {0}")]
    Collaborator(String),
}

pub type OptimaResult<T> = Result<T, OptimaError>;
