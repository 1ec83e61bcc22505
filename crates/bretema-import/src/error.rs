//! Import error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("glTF parse error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("mesh {mesh} primitive {primitive} has no POSITION attribute")]
    MissingPositions { mesh: usize, primitive: usize },

    #[error("mesh '{mesh}' needs {vertices} addressable vertices, more than 16-bit indices reach")]
    IndexOverflow { mesh: String, vertices: usize },

    #[error(transparent)]
    Mesh(#[from] bretema_core::Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;
