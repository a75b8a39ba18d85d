use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ConverterConfig;
use crate::resolve::{SearchPaths, basename};

/// Outcome of relocating one texture next to the scene output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopiedTexture {
    /// Value written into the shader input, relative to the output directory
    pub relative_path: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub copied: bool,
}

/// Copies referenced textures under `<output_dir>/<texture_dir>` and hands
/// back the relative path the shader should reference.
///
/// Copy failures are logged and recorded but never fail the conversion.
#[derive(Debug)]
pub struct TextureRelocator<'a> {
    output_dir: &'a Path,
    texture_dir: &'a Path,
    search_paths: &'a SearchPaths,
    relocated: Vec<CopiedTexture>,
}

impl<'a> TextureRelocator<'a> {
    pub fn new(config: &'a ConverterConfig, search_paths: &'a SearchPaths) -> Self {
        Self {
            output_dir: &config.output_dir,
            texture_dir: &config.texture_dir,
            search_paths,
            relocated: Vec::new(),
        }
    }

    /// Relocate `reference` and return the path to author on the shader.
    pub fn relocate(&mut self, reference: &str) -> String {
        let name = basename(reference);
        let relative = self.texture_dir.join(name);
        let relative_path = relative.to_string_lossy().replace('\\', "/");
        let destination = self.output_dir.join(&relative);

        let source = self
            .search_paths
            .find_file(reference)
            .or_else(|| self.search_paths.find_file(name))
            .unwrap_or_else(|| PathBuf::from(reference));

        let copied = match copy_texture(&source, &destination) {
            Ok(()) => {
                debug!(
                    source = %source.display(),
                    destination = %destination.display(),
                    "Copied texture"
                );
                true
            }
            Err(e) => {
                warn!(
                    source = %source.display(),
                    destination = %destination.display(),
                    "Failed to copy texture: {e}"
                );
                false
            }
        };

        self.relocated.push(CopiedTexture {
            relative_path: relative_path.clone(),
            source,
            destination,
            copied,
        });
        relative_path
    }

    pub fn relocated(&self) -> &[CopiedTexture] {
        &self.relocated
    }

    pub fn into_relocated(self) -> Vec<CopiedTexture> {
        self.relocated
    }
}

fn copy_texture(source: &Path, destination: &Path) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    // Copying a file onto itself would truncate it
    let same_file = matches!(
        (source.canonicalize(), destination.canonicalize()),
        (Ok(a), Ok(b)) if a == b
    );
    if same_file {
        return Ok(());
    }
    fs::copy(source, destination)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(output: &Path) -> ConverterConfig {
        ConverterConfig {
            output_dir: output.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn copies_from_search_path_by_basename() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::write(src.path().join("albedo.png"), b"pixels").unwrap();

        let mut paths = SearchPaths::new();
        paths.add(src.path());
        let config = config(out.path());
        let mut relocator = TextureRelocator::new(&config, &paths);

        let rel = relocator.relocate("model://robot/materials/albedo.png");
        assert_eq!(rel, "materials/textures/albedo.png");

        let copied = &relocator.relocated()[0];
        assert!(copied.copied);
        assert_eq!(copied.source, src.path().join("albedo.png"));
        assert_eq!(
            fs::read(out.path().join("materials/textures/albedo.png")).unwrap(),
            b"pixels"
        );
    }

    #[test]
    fn verbatim_path_wins() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let texture = src.path().join("nested").join("metal.png");
        fs::create_dir_all(texture.parent().unwrap()).unwrap();
        fs::write(&texture, b"m").unwrap();

        let paths = SearchPaths::new();
        let config = config(out.path());
        let mut relocator = TextureRelocator::new(&config, &paths);
        let rel = relocator.relocate(texture.to_str().unwrap());

        assert_eq!(rel, "materials/textures/metal.png");
        assert!(out.path().join("materials/textures/metal.png").is_file());
    }

    #[test]
    fn missing_source_is_not_fatal() {
        let out = tempfile::tempdir().unwrap();
        let paths = SearchPaths::new();
        let config = config(out.path());
        let mut relocator = TextureRelocator::new(&config, &paths);

        let rel = relocator.relocate("textures/ghost.png");
        assert_eq!(rel, "materials/textures/ghost.png");

        let relocated = relocator.into_relocated();
        assert_eq!(relocated.len(), 1);
        assert!(!relocated[0].copied);
        assert_eq!(relocated[0].source, PathBuf::from("textures/ghost.png"));
    }

    #[test]
    fn texture_already_in_place_is_kept() {
        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("materials/textures/wood.png");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, b"grain").unwrap();

        let paths = SearchPaths::new();
        let config = config(out.path());
        let mut relocator = TextureRelocator::new(&config, &paths);
        relocator.relocate(target.to_str().unwrap());

        assert_eq!(fs::read(&target).unwrap(), b"grain");
        assert!(relocator.relocated()[0].copied);
    }
}
