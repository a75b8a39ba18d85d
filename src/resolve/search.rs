use std::path::{Path, PathBuf};

use tracing::debug;

use super::env::Environment;

/// URI prefixes stripped before a name is looked up on disk.
const LOCAL_PREFIXES: [&str; 2] = ["file://", "model://"];

/// Ordered registry of directories searched for asset files.
#[derive(Debug, Clone, Default)]
pub struct SearchPaths {
    paths: Vec<PathBuf>,
}

impl SearchPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a `PATH`-style environment variable, if set.
    pub fn from_env(env: &dyn Environment, var: &str) -> Self {
        let mut paths = Self::new();
        if let Some(value) = env.var(var) {
            for dir in std::env::split_paths(&value) {
                paths.add(dir);
            }
        }
        paths
    }

    /// Register a directory; duplicates and empty paths are ignored.
    pub fn add(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        if dir.as_os_str().is_empty() || self.paths.contains(&dir) {
            return;
        }
        debug!(dir = %dir.display(), "Added search path");
        self.paths.push(dir);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// First existing file matching `name`: the name itself (after stripping
    /// `file://` / `model://`), then the name under each registered directory.
    pub fn find_file(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        let stripped = LOCAL_PREFIXES
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix))
            .unwrap_or(name);

        let direct = Path::new(stripped);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }

        let relative = stripped.trim_start_matches('/');
        self.paths
            .iter()
            .map(|dir| dir.join(relative))
            .find(|candidate| candidate.is_file())
    }
}
