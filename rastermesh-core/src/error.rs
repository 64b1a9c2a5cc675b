//! Error types for rastermesh

use thiserror::Error;

/// Main error type for rastermesh operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The facet/vertex back-reference invariant was already broken.
    #[error("Topology error: {0}")]
    Topology(String),

    #[error("Vertex {vertex} cannot own more than {capacity} facets")]
    VertexCapacity { vertex: usize, capacity: usize },

    #[error("Allocation failed: {0}")]
    Allocation(String),
}

/// Result type alias for rastermesh operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::collections::TryReserveError> for Error {
    fn from(e: std::collections::TryReserveError) -> Self {
        Error::Allocation(e.to_string())
    }
}
