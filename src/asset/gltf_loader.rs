use std::path::Path;

use glam::{Vec2, Vec3};
use tracing::{debug, warn};

use crate::error::{Result, SceneMirrorError};
use crate::types::{Color, MeshAsset, NativeMaterial, NativePbr, PbrKind, PrimitiveTopology, Submesh};

use super::obj_loader::asset_name;

/// Load a glTF or GLB file into a mesh asset, one submesh per primitive.
pub fn load_gltf(path: &Path) -> Result<MeshAsset> {
    let (document, buffers, _images) = gltf::import(path)
        .map_err(|e| SceneMirrorError::Asset(format!("Failed to load glTF {}: {e}", path.display())))?;

    debug!(
        meshes = document.meshes().len(),
        materials = document.materials().len(),
        "Loaded glTF document"
    );

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut submeshes = Vec::new();

    for mesh in document.meshes() {
        let mesh_name = mesh
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index()));
        let primitive_count = mesh.primitives().len();

        for primitive in mesh.primitives() {
            let name = if primitive_count == 1 {
                mesh_name.clone()
            } else {
                format!("{mesh_name}_{}", primitive.index())
            };
            match extract_primitive(name, &primitive, &buffers) {
                Ok(submesh) => submeshes.push(submesh),
                Err(e) => warn!(mesh = %mesh_name, "Skipping primitive: {e}"),
            }
        }
    }

    let materials = document
        .materials()
        .map(|m| convert_gltf_material(&m, base_dir))
        .collect();

    Ok(MeshAsset {
        name: asset_name(path),
        submeshes,
        materials,
    })
}

pub(crate) fn topology_from_mode(mode: gltf::mesh::Mode) -> PrimitiveTopology {
    match mode {
        gltf::mesh::Mode::Points => PrimitiveTopology::Points,
        gltf::mesh::Mode::Lines => PrimitiveTopology::Lines,
        gltf::mesh::Mode::LineLoop | gltf::mesh::Mode::LineStrip => PrimitiveTopology::LineStrips,
        gltf::mesh::Mode::Triangles => PrimitiveTopology::Triangles,
        gltf::mesh::Mode::TriangleStrip => PrimitiveTopology::TriangleStrips,
        gltf::mesh::Mode::TriangleFan => PrimitiveTopology::TriangleFans,
    }
}

/// Extract geometry from a single glTF primitive.
fn extract_primitive(
    name: String,
    primitive: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
) -> Result<Submesh> {
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let vertices: Vec<Vec3> = reader
        .read_positions()
        .ok_or_else(|| SceneMirrorError::Asset("Primitive missing positions".into()))?
        .map(Vec3::from)
        .collect();

    let normals = reader
        .read_normals()
        .map(|iter| iter.map(Vec3::from).collect())
        .unwrap_or_default();

    let tex_coords = reader
        .read_tex_coords(0)
        .map(|iter| iter.into_f32().map(Vec2::from).collect())
        .unwrap_or_default();

    // Non-indexed primitives draw their vertices in order
    let indices = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertices.len() as u32).collect(),
    };

    Ok(Submesh {
        name,
        vertices,
        normals,
        tex_coords,
        indices,
        topology: topology_from_mode(primitive.mode()),
        material_index: primitive.material().index(),
    })
}

/// Convert a glTF metallic-roughness material into a native material record.
fn convert_gltf_material(material: &gltf::Material<'_>, base_dir: &Path) -> NativeMaterial {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, a] = pbr.base_color_factor();

    let texture_uri = |texture: gltf::Texture| -> String {
        match texture.source().source() {
            gltf::image::Source::Uri { uri, .. } => {
                let candidate = base_dir.join(uri);
                if candidate.is_file() {
                    candidate.to_string_lossy().into_owned()
                } else {
                    uri.to_string()
                }
            }
            // Embedded images have no file to relocate
            gltf::image::Source::View { .. } => String::new(),
        }
    };

    let metallic_roughness_map = pbr
        .metallic_roughness_texture()
        .map(|info| texture_uri(info.texture()))
        .unwrap_or_default();

    let native_pbr = NativePbr {
        kind: PbrKind::Metal,
        albedo_map: pbr
            .base_color_texture()
            .map(|info| texture_uri(info.texture()))
            .unwrap_or_default(),
        normal_map: material
            .normal_texture()
            .map(|normal| texture_uri(normal.texture()))
            .unwrap_or_default(),
        metalness_map: metallic_roughness_map.clone(),
        roughness_map: metallic_roughness_map,
        emissive_map: material
            .emissive_texture()
            .map(|info| texture_uri(info.texture()))
            .unwrap_or_default(),
        ambient_occlusion_map: material
            .occlusion_texture()
            .map(|occlusion| texture_uri(occlusion.texture()))
            .unwrap_or_default(),
        roughness: pbr.roughness_factor(),
        metalness: pbr.metallic_factor(),
        ..Default::default()
    };

    NativeMaterial {
        name: material.name().unwrap_or_default().to_string(),
        diffuse: Color::new(r, g, b, a),
        emissive: Color::from_rgb(material.emissive_factor()),
        two_sided: material.double_sided(),
        transparency: 1.0 - a,
        pbr: Some(native_pbr),
        ..Default::default()
    }
}
