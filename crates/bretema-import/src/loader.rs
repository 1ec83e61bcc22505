//! Document to `MeshGroup` conversion.

use bretema_core::{Instance, Mesh, MeshGroup, MeshIndices, Vertex};
use glam::{Mat4, Vec2, Vec3, Vec4};
use gltf::mesh::Mode;
use hashbrown::HashMap;
use tracing::{debug, warn};

use crate::error::{ImportError, Result};

/// World transforms of every node referencing each mesh, keyed by mesh index.
fn collect_transforms(document: &gltf::Document) -> HashMap<usize, Vec<Mat4>> {
    fn walk(node: &gltf::Node<'_>, parent: Mat4, out: &mut HashMap<usize, Vec<Mat4>>) {
        let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
        if let Some(mesh) = node.mesh() {
            out.entry(mesh.index()).or_default().push(world);
        }
        for child in node.children() {
            walk(&child, world, out);
        }
    }

    let mut transforms = HashMap::new();
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next());
    if let Some(scene) = scene {
        for node in scene.nodes() {
            walk(&node, Mat4::IDENTITY, &mut transforms);
        }
    }
    transforms
}

pub(crate) fn load(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    source: &str,
) -> Result<MeshGroup> {
    let transforms = collect_transforms(document);
    let mut group = MeshGroup::new();

    for mesh in document.meshes() {
        let base_name = mesh
            .name()
            .map_or_else(|| format!("{source}.mesh{}", mesh.index()), str::to_string);
        let placements = transforms
            .get(&mesh.index())
            .map_or(&[][..], Vec::as_slice);
        let primitive_count = mesh.primitives().len();

        for primitive in mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                warn!(
                    "Skipping {:?} primitive {} of mesh '{base_name}'",
                    primitive.mode(),
                    primitive.index()
                );
                continue;
            }

            let name = if primitive_count > 1 {
                format!("{base_name}#{}", primitive.index())
            } else {
                base_name.clone()
            };

            let built = read_primitive(&mesh, &primitive, buffers, name, placements)?;
            debug!(
                "Mesh '{}': {} vertices, {} triangles, {} instances",
                built.name(),
                built.vertices().len(),
                built.triangle_count(),
                built.instances().len()
            );
            group.push(built);
        }
    }

    Ok(group)
}

fn read_primitive(
    mesh: &gltf::Mesh<'_>,
    primitive: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
    name: String,
    placements: &[Mat4],
) -> Result<Mesh> {
    let reader =
        primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or(ImportError::MissingPositions {
            mesh: mesh.index(),
            primitive: primitive.index(),
        })?
        .collect();
    let uvs: Vec<[f32; 2]> = reader
        .read_tex_coords(0)
        .map(|uvs| uvs.into_f32().collect())
        .unwrap_or_default();
    let normals: Vec<[f32; 3]> = reader.read_normals().map(Iterator::collect).unwrap_or_default();
    let tangents: Vec<[f32; 4]> = reader.read_tangents().map(Iterator::collect).unwrap_or_default();

    let vertices: Vec<Vertex> = positions
        .iter()
        .enumerate()
        .map(|(i, &pos)| Vertex {
            pos: Vec3::from_array(pos),
            uv0: uvs.get(i).copied().map_or(Vec2::ZERO, Vec2::from_array),
            normal: normals.get(i).copied().map_or(Vec3::ZERO, Vec3::from_array),
            tangent: tangents.get(i).copied().map_or(Vec4::ZERO, Vec4::from_array),
        })
        .collect();

    let overflow = |vertices: usize| ImportError::IndexOverflow {
        mesh: name.clone(),
        vertices,
    };
    let indices: MeshIndices = match reader.read_indices() {
        Some(indices) => indices
            .into_u32()
            .map(|index| u16::try_from(index).map_err(|_| overflow(index as usize + 1)))
            .collect::<Result<_>>()?,
        None => (0..vertices.len())
            .map(|index| u16::try_from(index).map_err(|_| overflow(vertices.len())))
            .collect::<Result<_>>()?,
    };

    let color = Vec4::from_array(
        primitive
            .material()
            .pbr_metallic_roughness()
            .base_color_factor(),
    );
    let instances = placements
        .iter()
        .map(|&transform| Instance { transform, color })
        .collect();

    Ok(Mesh::new(name, indices, vertices, instances)?)
}
