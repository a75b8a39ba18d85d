pub mod bounds;
pub mod material;
pub mod mesh;

pub use bounds::BoundingBox;
pub use material::{
    Color, MaterialSpec, NativeMaterial, NativePbr, NormalMapSpace, Pbr, PbrKind, PbrWorkflow,
};
pub use mesh::{MeshAsset, PrimitiveTopology, Submesh};
