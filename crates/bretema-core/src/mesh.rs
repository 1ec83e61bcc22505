//! Mesh data model.
//!
//! A [`Mesh`] is produced by an importer and consumed by renderers. It is
//! validated once at construction and immutable afterwards.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Index buffer contents.
pub type MeshIndices = Vec<u16>;

/// A single mesh vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv0: Vec2,
    pub normal: Vec3,
    /// XYZ normalized, W is the bitangent handedness (-1 or +1).
    pub tangent: Vec4,
}

impl Vertex {
    /// Vertex with only a position set.
    #[must_use]
    pub fn from_pos(pos: Vec3) -> Self {
        Self {
            pos,
            ..Self::default()
        }
    }
}

/// One positioned, colored draw of a mesh.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Instance {
    pub transform: Mat4,
    pub color: Vec4,
}

impl Default for Instance {
    fn default() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            color: Vec4::ONE,
        }
    }
}

/// Indexed triangle geometry plus its instances.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    name: String,
    indices: MeshIndices,
    vertices: Vec<Vertex>,
    instances: Vec<Instance>,
}

impl Mesh {
    /// Build a mesh, checking that every index addresses an existing vertex.
    pub fn new(
        name: impl Into<String>,
        indices: MeshIndices,
        vertices: Vec<Vertex>,
        instances: Vec<Instance>,
    ) -> Result<Self> {
        let name = name.into();

        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|&(_, &index)| usize::from(index) >= vertices.len())
        {
            return Err(Error::InvalidIndex {
                mesh: name,
                position,
                index,
                vertex_count: vertices.len(),
            });
        }

        Ok(Self {
            name,
            indices,
            vertices,
            instances,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[must_use]
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Returns `true` when the mesh has no instances and is drawn once as-is.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.instances.is_empty()
    }

    /// Number of complete triangles described by the index list.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.name)?;
        writeln!(f, "......")?;
        writeln!(f, "INDICES:")?;

        for (i, index) in self.indices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{index}")?;
        }

        writeln!(f)?;
        writeln!(f, "ATTRIBUTES (pos / uv0 / normal / tangent) :")?;
        for (n, v) in self.vertices.iter().enumerate() {
            writeln!(
                f,
                "{n}: {} / {} / {} / {}",
                v.pos, v.uv0, v.normal, v.tangent
            )?;
        }

        Ok(())
    }
}

/// Meshes produced by one import call, in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshGroup {
    meshes: Vec<Mesh>,
}

impl MeshGroup {
    #[must_use]
    pub const fn new() -> Self {
        Self { meshes: Vec::new() }
    }

    pub fn push(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Mesh> {
        self.meshes.get(index)
    }

    /// Find a mesh by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Mesh> {
        self.meshes.iter().find(|m| m.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mesh> {
        self.meshes.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Total vertex count across all meshes.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertices.len()).sum()
    }
}

impl From<Vec<Mesh>> for MeshGroup {
    fn from(meshes: Vec<Mesh>) -> Self {
        Self { meshes }
    }
}

impl FromIterator<Mesh> for MeshGroup {
    fn from_iter<I: IntoIterator<Item = Mesh>>(iter: I) -> Self {
        Self {
            meshes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MeshGroup {
    type Item = Mesh;
    type IntoIter = std::vec::IntoIter<Mesh>;

    fn into_iter(self) -> Self::IntoIter {
        self.meshes.into_iter()
    }
}

impl<'a> IntoIterator for &'a MeshGroup {
    type Item = &'a Mesh;
    type IntoIter = std::slice::Iter<'a, Mesh>;

    fn into_iter(self) -> Self::IntoIter {
        self.meshes.iter()
    }
}

impl std::ops::Index<usize> for MeshGroup {
    type Output = Mesh;

    fn index(&self, index: usize) -> &Mesh {
        &self.meshes[index]
    }
}

impl fmt::Display for MeshGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "MESHGROUP")?;
        writeln!(f, "--------")?;
        for mesh in &self.meshes {
            writeln!(f, "{mesh}")?;
        }
        Ok(())
    }
}
