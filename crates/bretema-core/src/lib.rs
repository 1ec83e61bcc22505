//! Core types for the Bretema engine.
//!
//! This crate provides the foundational types used throughout the engine:
//! - Mesh data model (vertices, instances, mesh groups)
//! - Fixed-function render state enums (culling, depth compare, MSAA)
//! - 2D/3D area helpers
//! - Engine-wide error type

pub mod error;
pub mod mesh;
pub mod types;

pub use error::{Error, Result};
pub use mesh::{Instance, Mesh, MeshGroup, MeshIndices, Vertex};
pub use types::{Area2D, Area3D, Compare, Cull, Depth, Samples};

/// World axis constants.
pub mod axis {
    use glam::Vec3;

    /// +X
    pub const RIGHT: Vec3 = Vec3::X;
    /// +Y
    pub const UP: Vec3 = Vec3::Y;
    /// +Z
    pub const FRONT: Vec3 = Vec3::Z;
}
