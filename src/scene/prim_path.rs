use serde::Serialize;

use crate::error::{Result, SceneMirrorError};

/// Absolute hierarchical path of a prim, e.g. `/World/robot/base_link`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PrimPath(String);

impl PrimPath {
    /// The pseudo-root `/`.
    pub fn root() -> Self {
        PrimPath("/".into())
    }

    /// Parse an absolute path. Relative paths and empty segments are rejected.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if path == "/" {
            return Ok(Self::root());
        }
        if !path.starts_with('/') {
            return Err(SceneMirrorError::SceneState(format!(
                "Prim path [{path}] is not absolute"
            )));
        }
        if path[1..].split('/').any(str::is_empty) {
            return Err(SceneMirrorError::SceneState(format!(
                "Prim path [{path}] has an empty segment"
            )));
        }
        Ok(PrimPath(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Last path segment; empty for the pseudo-root.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Parent path, or `None` for the pseudo-root.
    pub fn parent(&self) -> Option<PrimPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) | None => Some(Self::root()),
            Some(idx) => Some(PrimPath(self.0[..idx].to_string())),
        }
    }

    /// Path of a direct child named `name`.
    pub fn child(&self, name: &str) -> Result<PrimPath> {
        if name.is_empty() || name.contains('/') {
            return Err(SceneMirrorError::SceneState(format!(
                "Invalid prim name [{name}] under [{self}]"
            )));
        }
        if self.is_root() {
            Ok(PrimPath(format!("/{name}")))
        } else {
            Ok(PrimPath(format!("{}/{name}", self.0)))
        }
    }
}

impl std::fmt::Display for PrimPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
