use std::error::Error;
use std::fmt;

/// Failures reported by the catalog, index and clustering components.
///
/// None of these are retried by the engine; the caller decides what to do.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Source missing, unreadable, or empty after cleaning. Callers are
    /// expected to fall back to the sample catalog.
    DataUnavailable(String),
    /// Fewer usable rows than requested clusters.
    InsufficientData { rows: usize, required: usize },
    /// A cluster query was issued before any model was fitted.
    NotFitted,
    /// Limit or k of zero, unknown cluster id, negative preference, ...
    InvalidArgument(String),
    /// Another fit is already running against the same snapshot store.
    FitInProgress,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EngineError::DataUnavailable(reason) => write!(f, "Catalog data unavailable: {}", reason),
            EngineError::InsufficientData { rows, required } => write!(
                f,
                "Insufficient data: {} usable rows, at least {} required",
                rows, required
            ),
            EngineError::NotFitted => write!(f, "Cluster model has not been fitted"),
            EngineError::InvalidArgument(reason) => write!(f, "Invalid argument: {}", reason),
            EngineError::FitInProgress => write!(f, "A cluster fit is already in progress"),
        }
    }
}

impl Error for EngineError {}

pub type Result<T> = std::result::Result<T, EngineError>;
