use std::path::Path;

use glam::{Vec2, Vec3};
use tracing::{debug, warn};

use crate::error::{Result, SceneMirrorError};
use crate::types::{Color, MeshAsset, NativeMaterial, NativePbr, PbrKind, PrimitiveTopology, Submesh};

/// Load an OBJ file (+ associated MTL) into a mesh asset, one triangle
/// submesh per OBJ object/group.
pub fn load_obj(path: &Path) -> Result<MeshAsset> {
    let (models, materials_result) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)
        .map_err(|e| SceneMirrorError::Asset(format!("Failed to load OBJ {}: {e}", path.display())))?;

    debug!(model_count = models.len(), "Loaded OBJ models");

    let obj_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let tobj_materials = match materials_result {
        Ok(mats) => mats,
        Err(e) => {
            warn!("Failed to load MTL: {e}");
            Vec::new()
        }
    };

    let materials = tobj_materials
        .iter()
        .map(|m| convert_material(m, obj_dir))
        .collect();

    let submeshes = models
        .into_iter()
        .map(|model| convert_mesh(model.name, model.mesh))
        .collect();

    Ok(MeshAsset {
        name: asset_name(path),
        submeshes,
        materials,
    })
}

pub(crate) fn asset_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Convert a `tobj::Mesh` into a submesh. Texture coordinates are kept in
/// the OBJ convention; flipping is the exporter's job.
fn convert_mesh(name: String, mesh: tobj::Mesh) -> Submesh {
    let vertices = mesh
        .positions
        .chunks_exact(3)
        .map(|p| Vec3::new(p[0], p[1], p[2]))
        .collect();
    let normals = mesh
        .normals
        .chunks_exact(3)
        .map(|n| Vec3::new(n[0], n[1], n[2]))
        .collect();
    let tex_coords = mesh
        .texcoords
        .chunks_exact(2)
        .map(|uv| Vec2::new(uv[0], uv[1]))
        .collect();

    Submesh {
        name,
        vertices,
        normals,
        tex_coords,
        indices: mesh.indices,
        topology: PrimitiveTopology::Triangles,
        material_index: mesh.material_id,
    }
}

/// Convert an MTL material. PBR extension keys (`Pr`, `Pm`, `map_Pr`,
/// `map_Pm`, `norm`) produce a metal workflow record.
fn convert_material(mat: &tobj::Material, obj_dir: &Path) -> NativeMaterial {
    let texture = |name: &str| texture_reference(name, obj_dir);
    let param = |key: &str| mat.unknown_param.get(key).map(String::as_str);

    let dissolve = mat.dissolve.unwrap_or(1.0);
    let mut out = NativeMaterial {
        name: mat.name.clone(),
        shininess: mat.shininess.unwrap_or(0.0),
        transparency: 1.0 - dissolve,
        ..Default::default()
    };
    if let Some(ambient) = mat.ambient {
        out.ambient = Color::from_rgb(ambient);
    }
    if let Some(diffuse) = mat.diffuse {
        out.diffuse = Color::new(diffuse[0], diffuse[1], diffuse[2], dissolve);
    }
    if let Some(specular) = mat.specular {
        out.specular = Color::from_rgb(specular);
    }
    if let Some(emissive) = param("Ke").and_then(parse_rgb) {
        out.emissive = Color::from_rgb(emissive);
    }
    if let Some(ref diffuse_texture) = mat.diffuse_texture {
        out.texture_image = texture(diffuse_texture);
    }

    let roughness = param("Pr").and_then(|v| v.trim().parse::<f32>().ok());
    let metalness = param("Pm").and_then(|v| v.trim().parse::<f32>().ok());
    let roughness_map = param("map_Pr").map(texture);
    let metalness_map = param("map_Pm").map(texture);
    let normal_map = mat
        .normal_texture
        .as_deref()
        .or_else(|| param("norm"))
        .map(texture);

    let has_pbr = roughness.is_some()
        || metalness.is_some()
        || roughness_map.is_some()
        || metalness_map.is_some()
        || normal_map.is_some();
    if has_pbr {
        let defaults = NativePbr::default();
        out.pbr = Some(NativePbr {
            kind: PbrKind::Metal,
            roughness: roughness.unwrap_or(defaults.roughness),
            metalness: metalness.unwrap_or(defaults.metalness),
            roughness_map: roughness_map.unwrap_or_default(),
            metalness_map: metalness_map.unwrap_or_default(),
            normal_map: normal_map.unwrap_or_default(),
            ..defaults
        });
    }

    out
}

/// Texture references are made absolute when the file sits next to the OBJ;
/// otherwise the raw name is kept for later search-path resolution.
fn texture_reference(name: &str, obj_dir: &Path) -> String {
    let candidate = obj_dir.join(name);
    if candidate.is_file() {
        candidate.to_string_lossy().into_owned()
    } else {
        name.to_string()
    }
}

fn parse_rgb(value: &str) -> Option<[f32; 3]> {
    let parts: Vec<f32> = value
        .split_whitespace()
        .map(str::parse)
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [r, g, b, ..] => Some([*r, *g, *b]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn triangle_mesh(texcoords: Vec<f32>) -> tobj::Mesh {
        tobj::Mesh {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normals: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            texcoords,
            indices: vec![0, 1, 2],
            vertex_color: vec![],
            face_arities: vec![],
            texcoord_indices: vec![],
            normal_indices: vec![],
            material_id: Some(0),
        }
    }

    #[test]
    fn convert_mesh_basic() {
        let sub = convert_mesh("tri".into(), triangle_mesh(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]));
        assert_eq!(sub.name, "tri");
        assert_eq!(sub.vertex_count(), 3);
        assert_eq!(sub.index_count(), 3);
        assert_eq!(sub.normals.len(), 3);
        assert_eq!(sub.topology, PrimitiveTopology::Triangles);
        assert_eq!(sub.material_index, Some(0));
    }

    #[test]
    fn convert_mesh_keeps_uv_convention() {
        let sub = convert_mesh("tri".into(), triangle_mesh(vec![0.0, 0.0, 1.0, 0.3, 0.5, 1.0]));
        assert_eq!(sub.tex_coords[1], Vec2::new(1.0, 0.3));
    }

    #[test]
    fn parse_rgb_values() {
        assert_eq!(parse_rgb("1 0.5 0"), Some([1.0, 0.5, 0.0]));
        assert_eq!(parse_rgb("1 0.5"), None);
        assert_eq!(parse_rgb("a b c"), None);
    }

    #[test]
    fn load_obj_with_pbr_mtl() {
        let tmp = tempfile::tempdir().unwrap();
        let obj = "\
mtllib robot.mtl
o base
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
usemtl shiny
f 1/1 2/2 3/3
";
        let mtl = "\
newmtl shiny
Kd 0.8 0.1 0.1
Ks 0.5 0.5 0.5
Ke 0 0 0
Pr 0.25
Pm 0.75
map_Kd albedo.png
";
        fs::write(tmp.path().join("robot.obj"), obj).unwrap();
        fs::write(tmp.path().join("robot.mtl"), mtl).unwrap();
        fs::write(tmp.path().join("albedo.png"), b"png").unwrap();

        let asset = load_obj(&tmp.path().join("robot.obj")).unwrap();
        assert_eq!(asset.name, "robot");
        assert_eq!(asset.submesh_count(), 1);
        assert_eq!(asset.submeshes[0].name, "base");
        assert_eq!(asset.submeshes[0].material_index, Some(0));

        let mat = asset.material(0).unwrap();
        assert_eq!(mat.name, "shiny");
        assert_eq!(mat.diffuse.rgb(), [0.8, 0.1, 0.1]);
        assert_eq!(mat.specular, Color::new(0.5, 0.5, 0.5, 1.0));
        assert_eq!(mat.emissive, Color::OPAQUE_BLACK);
        assert_eq!(
            mat.texture_image,
            tmp.path().join("albedo.png").to_string_lossy()
        );
        let pbr = mat.pbr.as_ref().unwrap();
        assert_eq!(pbr.kind, PbrKind::Metal);
        assert_eq!(pbr.roughness, 0.25);
        assert_eq!(pbr.metalness, 0.75);
    }

    #[test]
    fn load_obj_missing_file() {
        let err = load_obj(Path::new("/nonexistent/file.obj")).unwrap_err();
        assert!(matches!(err, SceneMirrorError::Asset(_)));
    }
}
