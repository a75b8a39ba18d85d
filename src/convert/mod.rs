pub mod geometry;
pub mod material;
pub mod selection;
pub mod texture;

use std::path::PathBuf;
use std::time::Instant;

use glam::Vec3;
use serde::Serialize;
use tracing::{info, warn};

use crate::asset::{MeshLoader, MeshManager};
use crate::config::ConverterConfig;
use crate::error::{Result, SceneMirrorError};
use crate::resolve::{Environment, ProcessEnvironment, SearchPaths, resolve_mesh_file};
use crate::scene::{PrimPath, SceneStage};
use crate::types::MaterialSpec;

pub use material::{MaterialNamer, should_bind};
pub use texture::{CopiedTexture, TextureRelocator};

/// What to convert and where to place it.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshReference {
    /// Logical filename or `http(s)` URI of the mesh
    pub filename: String,
    /// Target prim path
    pub path: String,
    pub scale: Vec3,
}

impl MeshReference {
    pub fn new(filename: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
            scale: Vec3::ONE,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}

/// Summary of one successful conversion.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionReport {
    pub mesh_file: PathBuf,
    pub geometry_prims: Vec<PrimPath>,
    pub material_prims: Vec<PrimPath>,
    pub bound_count: usize,
    pub textures: Vec<CopiedTexture>,
}

/// Converts simulator meshes into scene prims.
///
/// Holds the resolution state (search paths grow as remote assets are
/// resolved) and the mesh cache, so one converter should serve a whole
/// session.
pub struct MeshConverter<L = MeshManager, E = ProcessEnvironment> {
    config: ConverterConfig,
    search_paths: SearchPaths,
    loader: L,
    env: E,
}

impl MeshConverter {
    /// Converter reading the process environment and decoding from disk.
    pub fn new(config: ConverterConfig) -> Self {
        Self::with_parts(config, MeshManager::new(), ProcessEnvironment)
    }
}

impl<L: MeshLoader, E: Environment> MeshConverter<L, E> {
    pub fn with_parts(config: ConverterConfig, loader: L, env: E) -> Self {
        let mut search_paths = SearchPaths::from_env(&env, &config.search_path_var);
        for dir in &config.search_paths {
            search_paths.add(dir.clone());
        }
        Self {
            config,
            search_paths,
            loader,
            env,
        }
    }

    pub fn search_paths(&self) -> &SearchPaths {
        &self.search_paths
    }

    /// Convert `mesh` into `stage`.
    ///
    /// Emits one `Mesh` prim per selected submesh and one `Material` prim
    /// per material reference, named from `namer`. Any error aborts the
    /// call; prims written before it stay in the stage.
    pub fn update_mesh(
        &mut self,
        mesh: &MeshReference,
        stage: &mut dyn SceneStage,
        namer: &mut MaterialNamer,
    ) -> Result<ConversionReport> {
        let start = Instant::now();
        let mesh_file = resolve_mesh_file(&mesh.filename, &self.config, &self.env, &mut self.search_paths)?;
        let asset = self.loader.load(&mesh_file)?;

        let selected = selection::select_submeshes(&asset, &mesh.path);
        if selected.is_empty() {
            warn!(mesh = %mesh.filename, "Mesh asset has no submeshes");
        }
        let bounds = asset.bounds();

        let mut report = ConversionReport {
            mesh_file,
            ..Default::default()
        };

        for index in selected {
            let submesh = asset.submesh(index).ok_or_else(|| {
                SceneMirrorError::Asset(format!("Unable to get a submesh {index} from [{}]", asset.name))
            })?;

            let prim_path = PrimPath::new(selection::submesh_prim_path(&mesh.path, &submesh.name))?;
            geometry::write_geometry(stage, &prim_path, submesh, &bounds)?;

            if let Some(material_index) = submesh.material_index {
                let native = asset.material(material_index).ok_or_else(|| {
                    SceneMirrorError::Asset(format!(
                        "Submesh [{}] references missing material {material_index}",
                        submesh.name
                    ))
                })?;
                let spec = MaterialSpec::from(native);

                let mut textures = TextureRelocator::new(&self.config, &self.search_paths);
                let material_path = material::write_material(stage, &spec, namer, &mut textures)?;
                report.textures.extend(textures.into_relocated());

                if should_bind(&spec) {
                    stage.bind_material(&prim_path, &material_path)?;
                    report.bound_count += 1;
                }
                report.material_prims.push(material_path);
            }

            geometry::write_scale(stage, &prim_path, mesh.scale)?;
            report.geometry_prims.push(prim_path);
        }

        info!(
            mesh = %mesh.filename,
            path = %mesh.path,
            geometry = report.geometry_prims.len(),
            materials = report.material_prims.len(),
            bound = report.bound_count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Converted mesh"
        );
        Ok(report)
    }
}
