use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Failures that abort a rerun.
///
/// Missing input and under-specified chart parameters are not errors: they
/// are reported through [`crate::dashboard::Frame`] as prompts and warnings.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("the file has no header row")]
    EmptyInput,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No numeric columns found.")]
    NoNumericColumns,
}

pub type DashboardResult<T> = Result<T, DashboardError>;
