//! Error types for relay coverage planning.
//!
//! The selection algorithm itself never fails. These errors cover the
//! surfaces around it: parsing raw relay URLs and running a plan on the
//! blocking pool.

use thiserror::Error;

/// Errors that can occur while preparing or running a coverage plan.
#[derive(Debug, Error)]
pub enum CoverageError {
    /// Raw relay URL could not be turned into a canonical relay URL.
    #[error("Invalid relay URL: {0}")]
    InvalidUrl(String),

    /// Background planning task did not complete.
    #[error("Coverage task failed: {0}")]
    Task(String),
}

/// Result type for coverage operations.
pub type CoverageResult<T> = Result<T, CoverageError>;
