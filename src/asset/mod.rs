pub mod gltf_loader;
pub mod obj_loader;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::error::{Result, SceneMirrorError};
use crate::types::MeshAsset;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Gltf,
    Glb,
}

impl MeshFormat {
    /// Detect format from file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "obj" => Ok(MeshFormat::Obj),
            "gltf" => Ok(MeshFormat::Gltf),
            "glb" => Ok(MeshFormat::Glb),
            _ => Err(SceneMirrorError::Asset(format!(
                "Unsupported mesh format: .{ext}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeshFormat::Obj => "OBJ",
            MeshFormat::Gltf => "glTF",
            MeshFormat::Glb => "GLB",
        }
    }
}

impl std::fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of loaded mesh assets, keyed by resolved file path.
pub trait MeshLoader {
    fn load(&mut self, path: &Path) -> Result<Arc<MeshAsset>>;
}

/// Mesh cache: each resolved path is decoded at most once and then shared.
#[derive(Debug, Default)]
pub struct MeshManager {
    cache: HashMap<PathBuf, Arc<MeshAsset>>,
}

impl MeshManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already-built asset under `path`, replacing any cached one.
    pub fn insert(&mut self, path: impl Into<PathBuf>, asset: MeshAsset) -> Arc<MeshAsset> {
        let asset = Arc::new(asset);
        self.cache.insert(path.into(), Arc::clone(&asset));
        asset
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.cache.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl MeshLoader for MeshManager {
    fn load(&mut self, path: &Path) -> Result<Arc<MeshAsset>> {
        if let Some(asset) = self.cache.get(path) {
            return Ok(Arc::clone(asset));
        }

        let format = MeshFormat::from_path(path)?;
        let asset = match format {
            MeshFormat::Obj => obj_loader::load_obj(path)?,
            MeshFormat::Gltf | MeshFormat::Glb => gltf_loader::load_gltf(path)?,
        };
        info!(
            format = %format,
            path = %path.display(),
            submeshes = asset.submesh_count(),
            materials = asset.materials.len(),
            "Loaded mesh asset"
        );

        Ok(self.insert(path, asset))
    }
}
