use glam::{Vec2, Vec3};
use tracing::{debug, error};

use crate::error::{Result, SceneMirrorError};
use crate::scene::{Attribute, AttributeValue, Interpolation, PrimPath, SceneStage};
use crate::types::{BoundingBox, Submesh};

/// One `faceVertexCounts` entry per face, each equal to the topology's
/// vertices per face. Strip and fan topologies are rejected.
pub fn face_vertex_counts(submesh: &Submesh) -> Result<Vec<i32>> {
    let per_face = submesh.topology.vertices_per_face().ok_or_else(|| {
        error!(
            submesh = %submesh.name,
            topology = %submesh.topology,
            "Submesh has a primitive type that is not supported"
        );
        SceneMirrorError::UnsupportedInput(format!(
            "Submesh [{}] has unsupported primitive type: {}",
            submesh.name, submesh.topology
        ))
    })?;
    Ok(vec![per_face as i32; submesh.index_count() / per_face])
}

/// Flip V to the scene format's texture origin.
pub fn flip_uvs(uvs: &[Vec2]) -> Vec<Vec2> {
    uvs.iter().map(|uv| Vec2::new(uv.x, 1.0 - uv.y)).collect()
}

fn face_vertex_indices(submesh: &Submesh) -> Result<Vec<i32>> {
    submesh
        .indices
        .iter()
        .map(|&i| {
            i32::try_from(i).map_err(|_| {
                SceneMirrorError::UnsupportedInput(format!(
                    "Submesh [{}] index {i} exceeds the int range",
                    submesh.name
                ))
            })
        })
        .collect()
}

/// Define a `Mesh` prim at `path` and author the submesh geometry on it.
///
/// Topology is validated before the prim is defined, so a rejected submesh
/// leaves nothing behind.
pub fn write_geometry(
    stage: &mut dyn SceneStage,
    path: &PrimPath,
    submesh: &Submesh,
    bounds: &BoundingBox,
) -> Result<()> {
    let counts = face_vertex_counts(submesh)?;
    let indices = face_vertex_indices(submesh)?;

    let prim = stage.define_prim(path, "Mesh")?;
    prim.set_attribute(
        "points",
        Attribute::new(AttributeValue::Point3fArray(submesh.vertices.clone())),
    );
    prim.set_attribute("faceVertexIndices", Attribute::new(AttributeValue::IntArray(indices)));
    prim.set_attribute("faceVertexCounts", Attribute::new(AttributeValue::IntArray(counts)));
    prim.set_attribute(
        "primvars:st",
        Attribute::new(AttributeValue::TexCoord2fArray(flip_uvs(&submesh.tex_coords)))
            .with_interpolation(Interpolation::Vertex),
    );
    prim.set_attribute(
        "normals",
        Attribute::new(AttributeValue::Normal3fArray(submesh.normals.clone()))
            .with_interpolation(Interpolation::Vertex),
    );
    prim.set_attribute(
        "subdivisionScheme",
        Attribute::uniform(AttributeValue::Token("none".into())),
    );
    prim.set_attribute(
        "extent",
        Attribute::new(AttributeValue::Float3Array(bounds.extent().to_vec())),
    );

    debug!(
        path = %path,
        points = submesh.vertex_count(),
        indices = submesh.index_count(),
        topology = %submesh.topology,
        "Wrote mesh geometry"
    );
    Ok(())
}

/// Author a scale transform op; points are never baked.
pub fn write_scale(stage: &mut dyn SceneStage, path: &PrimPath, scale: Vec3) -> Result<()> {
    stage.set_attribute(path, "xformOp:scale", Attribute::new(AttributeValue::Float3(scale)))?;
    stage.set_attribute(
        path,
        "xformOpOrder",
        Attribute::uniform(AttributeValue::TokenArray(vec!["xformOp:scale".into()])),
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::scene::MemoryStage;
    use crate::types::PrimitiveTopology;

    fn submesh(topology: PrimitiveTopology, index_count: u32) -> Submesh {
        Submesh {
            name: "part".into(),
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            indices: (0..index_count).map(|i| i % 3).collect(),
            topology,
            ..Default::default()
        }
    }

    #[test]
    fn face_counts_for_supported_topologies() {
        for (topology, per_face) in [
            (PrimitiveTopology::Points, 1),
            (PrimitiveTopology::Lines, 2),
            (PrimitiveTopology::Triangles, 3),
        ] {
            let sub = submesh(topology, 12);
            let counts = face_vertex_counts(&sub).unwrap();
            assert_eq!(counts.len(), 12 / per_face);
            assert!(counts.iter().all(|&c| c == per_face as i32));
        }
    }

    #[test]
    fn face_counts_truncate_partial_faces() {
        let counts = face_vertex_counts(&submesh(PrimitiveTopology::Triangles, 7)).unwrap();
        assert_eq!(counts, vec![3, 3]);
    }

    #[test]
    fn strip_topologies_rejected() {
        for topology in [
            PrimitiveTopology::LineStrips,
            PrimitiveTopology::TriangleFans,
            PrimitiveTopology::TriangleStrips,
        ] {
            let err = face_vertex_counts(&submesh(topology, 6)).unwrap_err();
            assert!(matches!(err, SceneMirrorError::UnsupportedInput(_)));
        }
    }

    #[test]
    fn uv_v_flip() {
        let flipped = flip_uvs(&[Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.3), Vec2::new(0.25, 1.0)]);
        assert_relative_eq!(flipped[0].y, 1.0);
        assert_relative_eq!(flipped[1].x, 1.0);
        assert_relative_eq!(flipped[1].y, 0.7, epsilon = 1e-6);
        assert_relative_eq!(flipped[2].x, 0.25);
        assert_relative_eq!(flipped[2].y, 0.0);
    }

    #[test]
    fn write_geometry_attributes() {
        let mut stage = MemoryStage::new();
        let path = PrimPath::new("/World/part").unwrap();
        let mut sub = submesh(PrimitiveTopology::Triangles, 3);
        sub.normals = vec![Vec3::Z; 3];
        sub.tex_coords = vec![Vec2::new(0.0, 0.25); 3];
        let bounds = BoundingBox {
            min: Vec3::splat(-2.0),
            max: Vec3::splat(2.0),
        };

        write_geometry(&mut stage, &path, &sub, &bounds).unwrap();
        write_scale(&mut stage, &path, Vec3::new(1.0, 2.0, 3.0)).unwrap();

        let prim = stage.prim(&path).unwrap();
        assert!(prim.is_a("Mesh"));
        assert_eq!(
            prim.value("points"),
            Some(&AttributeValue::Point3fArray(vec![Vec3::ZERO, Vec3::X, Vec3::Y]))
        );
        assert_eq!(prim.value("faceVertexIndices"), Some(&AttributeValue::IntArray(vec![0, 1, 2])));
        assert_eq!(prim.value("faceVertexCounts"), Some(&AttributeValue::IntArray(vec![3])));
        assert_eq!(
            prim.value("primvars:st"),
            Some(&AttributeValue::TexCoord2fArray(vec![Vec2::new(0.0, 0.75); 3]))
        );
        assert_eq!(
            prim.attribute("normals").unwrap().interpolation,
            Some(Interpolation::Vertex)
        );
        assert_eq!(
            prim.value("subdivisionScheme"),
            Some(&AttributeValue::Token("none".into()))
        );
        assert_eq!(
            prim.value("extent"),
            Some(&AttributeValue::Float3Array(vec![Vec3::splat(-2.0), Vec3::splat(2.0)]))
        );
        assert_eq!(
            prim.value("xformOp:scale"),
            Some(&AttributeValue::Float3(Vec3::new(1.0, 2.0, 3.0)))
        );
        assert_eq!(
            prim.value("xformOpOrder"),
            Some(&AttributeValue::TokenArray(vec!["xformOp:scale".into()]))
        );
    }

    #[test]
    fn rejected_topology_defines_nothing() {
        let mut stage = MemoryStage::new();
        let path = PrimPath::new("/World/strip").unwrap();
        let sub = submesh(PrimitiveTopology::TriangleStrips, 6);
        assert!(write_geometry(&mut stage, &path, &sub, &BoundingBox::ZERO).is_err());
        assert!(stage.is_empty());
    }
}
