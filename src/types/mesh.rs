use glam::{Vec2, Vec3};

use super::bounds::BoundingBox;
use super::material::NativeMaterial;

/// How a submesh's index buffer is assembled into faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveTopology {
    Points,
    Lines,
    LineStrips,
    #[default]
    Triangles,
    TriangleFans,
    TriangleStrips,
}

impl PrimitiveTopology {
    /// Vertices per face for list topologies; `None` for strips and fans,
    /// whose face sizes are not uniform in the index buffer.
    pub fn vertices_per_face(self) -> Option<usize> {
        match self {
            PrimitiveTopology::Points => Some(1),
            PrimitiveTopology::Lines => Some(2),
            PrimitiveTopology::Triangles => Some(3),
            PrimitiveTopology::LineStrips
            | PrimitiveTopology::TriangleFans
            | PrimitiveTopology::TriangleStrips => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveTopology::Points => "points",
            PrimitiveTopology::Lines => "lines",
            PrimitiveTopology::LineStrips => "line strips",
            PrimitiveTopology::Triangles => "triangles",
            PrimitiveTopology::TriangleFans => "triangle fans",
            PrimitiveTopology::TriangleStrips => "triangle strips",
        }
    }
}

impl std::fmt::Display for PrimitiveTopology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One drawable piece of a mesh asset.
#[derive(Debug, Clone, Default)]
pub struct Submesh {
    pub name: String,
    pub vertices: Vec<Vec3>,
    /// Per-vertex normals, or empty
    pub normals: Vec<Vec3>,
    /// Per-vertex texture coordinates in the simulator's convention, or empty
    pub tex_coords: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub topology: PrimitiveTopology,
    /// Index into the owning asset's material registry
    pub material_index: Option<usize>,
}

impl Submesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// A loaded mesh asset. Owns its submeshes and materials; callers access
/// submeshes by index for as long as they hold the asset.
#[derive(Debug, Clone, Default)]
pub struct MeshAsset {
    pub name: String,
    pub submeshes: Vec<Submesh>,
    pub materials: Vec<NativeMaterial>,
}

impl MeshAsset {
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    pub fn submesh(&self, index: usize) -> Option<&Submesh> {
        self.submeshes.get(index)
    }

    pub fn material(&self, index: usize) -> Option<&NativeMaterial> {
        self.materials.get(index)
    }

    /// Bounds over the vertices of every submesh.
    pub fn bounds(&self) -> BoundingBox {
        self.submeshes
            .iter()
            .filter_map(|s| BoundingBox::from_points(&s.vertices))
            .reduce(|a, b| a.merge(&b))
            .unwrap_or(BoundingBox::ZERO)
    }
}
