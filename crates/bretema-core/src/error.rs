//! Error types for the engine.

use thiserror::Error;

/// Engine-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// An index points past the end of the vertex list
    #[error(
        "Mesh '{mesh}': index {index} at position {position} addresses a missing vertex \
         (vertex count {vertex_count})"
    )]
    InvalidIndex {
        mesh: String,
        position: usize,
        index: u16,
        vertex_count: usize,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
