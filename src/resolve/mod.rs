pub mod env;
pub mod reference;
pub mod search;

use std::path::PathBuf;

use tracing::{error, info};

use crate::config::ConverterConfig;
use crate::error::{Result, SceneMirrorError};

pub use env::{Environment, ProcessEnvironment};
pub use reference::{AssetReference, RemoteAsset, basename};
pub use search::SearchPaths;

/// Locate the local file backing a mesh filename or URI.
///
/// Remote references are mapped into the local asset cache, whose root comes
/// from a required environment variable; every cache directory on the way
/// to the file is registered as a search path. Local references are looked
/// up verbatim, then by basename.
pub fn resolve_mesh_file(
    filename: &str,
    config: &ConverterConfig,
    env: &dyn Environment,
    search_paths: &mut SearchPaths,
) -> Result<PathBuf> {
    match AssetReference::parse(filename)? {
        AssetReference::Remote(remote) => {
            let home = env.required(&config.cache_root_var).inspect_err(|_| {
                error!(
                    var = %config.cache_root_var,
                    resource = filename,
                    "Cache root variable undefined, resource cannot be found"
                );
            })?;
            let cache_root = PathBuf::from(home).join(&config.cache_dir);

            let dirs = remote.search_dirs(&cache_root);
            for dir in &dirs {
                search_paths.add(dir.clone());
            }
            let local = dirs.last().cloned().unwrap_or(cache_root);
            if !local.is_file() {
                return Err(SceneMirrorError::Resolution(format!(
                    "Remote asset [{filename}] is not in the local cache at {}",
                    local.display()
                )));
            }
            info!(uri = filename, path = %local.display(), "Resolved cached remote mesh");
            Ok(local)
        }
        AssetReference::Local(name) => {
            if let Some(found) = search_paths.find_file(&name) {
                info!(mesh = %name, path = %found.display(), "Found mesh file");
                return Ok(found);
            }

            info!(mesh = %name, "Couldn't find file, trying again with just the basename");
            match search_paths.find_file(basename(&name)) {
                Some(found) => {
                    info!(mesh = %name, path = %found.display(), "Found mesh file");
                    Ok(found)
                }
                None => Err(SceneMirrorError::Resolution(format!(
                    "Couldn't locate mesh file [{name}]"
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use super::*;

    fn env_with_home(home: &std::path::Path) -> HashMap<String, String> {
        [("HOME".to_string(), home.to_string_lossy().into_owned())]
            .into_iter()
            .collect()
    }

    #[test]
    fn local_found_by_basename() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("arm.obj"), "").unwrap();
        let mut paths = SearchPaths::new();
        paths.add(tmp.path());

        let found = resolve_mesh_file(
            "some/other/dir/arm.obj",
            &ConverterConfig::default(),
            &HashMap::<String, String>::new(),
            &mut paths,
        )
        .unwrap();
        assert_eq!(found, tmp.path().join("arm.obj"));
    }

    #[test]
    fn local_missing() {
        let err = resolve_mesh_file(
            "nowhere/ghost.obj",
            &ConverterConfig::default(),
            &HashMap::<String, String>::new(),
            &mut SearchPaths::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SceneMirrorError::Resolution(_)));
    }

    #[test]
    fn remote_requires_cache_root_before_searching() {
        let mut paths = SearchPaths::new();
        let err = resolve_mesh_file(
            "https://fuel.gazebosim.org/1.0/owner/models/box/1/files/meshes/box.obj",
            &ConverterConfig::default(),
            &HashMap::<String, String>::new(),
            &mut paths,
        )
        .unwrap_err();
        assert!(matches!(err, SceneMirrorError::Configuration(_)));
        assert!(paths.paths().is_empty());
    }

    #[test]
    fn remote_resolves_into_cache() {
        let home = tempfile::tempdir().unwrap();
        let model_dir = home
            .path()
            .join(".gz/fuel/fuel.gazebosim.org/owner/models/box/1");
        fs::create_dir_all(model_dir.join("meshes")).unwrap();
        fs::write(model_dir.join("meshes/box.obj"), "").unwrap();

        let mut paths = SearchPaths::new();
        let found = resolve_mesh_file(
            "https://fuel.gazebosim.org/1.0/Owner/models/Box/1/files/meshes/Box.obj",
            &ConverterConfig::default(),
            &env_with_home(home.path()),
            &mut paths,
        )
        .unwrap();

        assert_eq!(found, model_dir.join("meshes/box.obj"));
        assert_eq!(paths.paths().len(), 3);
        assert_eq!(paths.paths()[0], model_dir);
        assert_eq!(paths.paths()[1], model_dir.join("meshes"));
    }

    #[test]
    fn remote_not_cached() {
        let home = tempfile::tempdir().unwrap();
        let err = resolve_mesh_file(
            "https://fuel.gazebosim.org/1.0/owner/models/box/1/files/meshes/box.obj",
            &ConverterConfig::default(),
            &env_with_home(home.path()),
            &mut SearchPaths::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SceneMirrorError::Resolution(_)));
    }
}
