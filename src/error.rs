use thiserror::Error;

/// Errors surfaced by the analytics core.
///
/// Sparse or empty data is never an error: analytic computations degrade to
/// zeroed/neutral results. Only real storage faults and malformed input to a
/// public call reach callers as `Err`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt value in store: {0}")]
    Corrupt(String),

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
}

impl Error {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
