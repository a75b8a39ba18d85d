pub mod asset;
pub mod config;
pub mod convert;
pub mod error;
pub mod path;
pub mod resolve;
pub mod scene;
pub mod types;

pub use config::ConverterConfig;
pub use convert::{ConversionReport, MaterialNamer, MeshConverter, MeshReference};
pub use error::{Result, SceneMirrorError};
pub use path::valid_path;
pub use scene::{MemoryStage, PrimPath, SceneStage};
