//! glTF import for the Bretema engine.
//!
//! Turns `.gltf`/`.glb` data into a [`MeshGroup`]: one [`Mesh`] per triangle
//! primitive, with one instance per scene node that references it.
//!
//! [`Mesh`]: bretema_core::Mesh

mod error;
mod loader;

use std::path::Path;

use bretema_core::MeshGroup;
use tracing::info;

pub use error::{ImportError, Result};

/// Import a `.gltf` or `.glb` file. External buffers resolve relative to it.
pub fn parse_file(path: impl AsRef<Path>) -> Result<MeshGroup> {
    let path = path.as_ref();
    let (document, buffers, _images) = gltf::import(path)?;
    let source = path
        .file_stem()
        .map_or_else(|| "gltf".into(), |stem| stem.to_string_lossy());
    let group = loader::load(&document, &buffers, &source)?;
    info!(
        "Imported {} meshes from {}",
        group.len(),
        path.display()
    );
    Ok(group)
}

/// Import glTF JSON or GLB bytes. Buffers must be embedded.
///
/// `name` prefixes meshes that have no name of their own.
pub fn parse_binary(bytes: &[u8], name: &str) -> Result<MeshGroup> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;
    let group = loader::load(&document, &buffers, name)?;
    info!("Imported {} meshes from '{name}'", group.len());
    Ok(group)
}
