use std::path::PathBuf;

use clap::Parser;
use glam::Vec3;

/// Converter settings shared by every conversion call.
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Base directory that relocated textures are copied under
    pub output_dir: PathBuf,
    /// Environment variable holding the local asset cache root
    pub cache_root_var: String,
    /// Cache directory below the cache root
    pub cache_dir: PathBuf,
    /// `PATH`-style environment variable listing extra resource directories
    pub search_path_var: String,
    /// Texture destination relative to `output_dir`
    pub texture_dir: PathBuf,
    /// Extra directories searched for meshes and textures
    pub search_paths: Vec<PathBuf>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            cache_root_var: "HOME".into(),
            cache_dir: PathBuf::from(".gz").join("fuel"),
            search_path_var: "GZ_FILE_PATH".into(),
            texture_dir: PathBuf::from("materials").join("textures"),
            search_paths: Vec::new(),
        }
    }
}

/// CLI argument definition (clap derive).
#[derive(Parser, Debug)]
#[command(
    name = "scene-mirror",
    about = "Convert a simulation mesh into scene-description prims (USDA)",
    version
)]
pub struct CliArgs {
    /// Mesh file name or URI (OBJ, glTF, GLB; http(s) URIs resolve into the local cache)
    #[arg(short = 'i', long)]
    pub input: String,

    /// Prim path the mesh is placed at
    #[arg(short = 'p', long, default_value = "/World/mesh")]
    pub prim_path: String,

    /// Non-uniform scale applied as a transform op
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values_t = [1.0, 1.0, 1.0])]
    pub scale: Vec<f32>,

    /// Output directory for scene.usda and relocated textures
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Additional resource search directory (repeatable)
    #[arg(long = "search-path")]
    pub search_paths: Vec<PathBuf>,

    /// Environment variable naming the asset cache root
    #[arg(long, default_value = "HOME")]
    pub cache_root_var: String,

    /// Print the conversion report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Scale as a vector; missing components default to 1.
    pub fn scale_vec(&self) -> Vec3 {
        let get = |i: usize| self.scale.get(i).copied().unwrap_or(1.0);
        Vec3::new(get(0), get(1), get(2))
    }
}

impl From<&CliArgs> for ConverterConfig {
    fn from(args: &CliArgs) -> Self {
        ConverterConfig {
            output_dir: args.output.clone(),
            cache_root_var: args.cache_root_var.clone(),
            search_paths: args.search_paths.clone(),
            ..Default::default()
        }
    }
}
