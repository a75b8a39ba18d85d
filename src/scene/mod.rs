pub mod prim_path;
pub mod stage;
pub mod usda;
pub mod value;

pub use prim_path::PrimPath;
pub use stage::{MATERIAL_BINDING, MemoryStage, Prim, SceneStage};
pub use value::{Attribute, AttributeMetadata, AttributeValue, Connection, Interpolation};
