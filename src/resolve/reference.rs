use std::path::{Path, PathBuf};

use crate::error::{Result, SceneMirrorError};

/// Schemes fetched from a remote asset server and mirrored in a local cache.
const REMOTE_SCHEMES: [&str; 2] = ["http", "https"];

/// Number of positional segments in front of a remote asset's sub-path:
/// server, protocol version, owner, kind, name, version, and the marker
/// segment (conventionally `files`).
const REMOTE_PREFIX_SEGMENTS: usize = 7;

/// A remote asset location, with every segment lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAsset {
    pub server: String,
    pub protocol_version: String,
    pub owner: String,
    pub kind: String,
    pub name: String,
    pub version: String,
    /// Nested path below the asset's file root
    pub subpath: Vec<String>,
}

impl RemoteAsset {
    /// Directory of this asset version inside the local cache.
    pub fn cache_dir(&self, cache_root: &Path) -> PathBuf {
        cache_root
            .join(&self.server)
            .join(&self.owner)
            .join(&self.kind)
            .join(&self.name)
            .join(&self.version)
    }

    /// The asset directory followed by each progressively deeper sub-path
    /// join; the last entry is the expected local file.
    pub fn search_dirs(&self, cache_root: &Path) -> Vec<PathBuf> {
        let mut current = self.cache_dir(cache_root);
        let mut dirs = vec![current.clone()];
        for segment in &self.subpath {
            current = current.join(segment);
            dirs.push(current.clone());
        }
        dirs
    }
}

/// A mesh filename classified once by scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetReference {
    Local(String),
    Remote(RemoteAsset),
}

impl AssetReference {
    pub fn parse(filename: &str) -> Result<Self> {
        let Some((scheme, rest)) = filename.split_once("://") else {
            return Ok(AssetReference::Local(filename.to_string()));
        };

        if !REMOTE_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) {
            return Ok(AssetReference::Local(filename.to_string()));
        }

        let tokens: Vec<String> = rest
            .split('/')
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();
        if tokens.len() < REMOTE_PREFIX_SEGMENTS - 1 {
            return Err(SceneMirrorError::Resolution(format!(
                "Remote asset URI [{filename}] has {} path segments; expected at least {}",
                tokens.len(),
                REMOTE_PREFIX_SEGMENTS - 1
            )));
        }

        Ok(AssetReference::Remote(RemoteAsset {
            server: tokens[0].clone(),
            protocol_version: tokens[1].clone(),
            owner: tokens[2].clone(),
            kind: tokens[3].clone(),
            name: tokens[4].clone(),
            version: tokens[5].clone(),
            subpath: tokens.iter().skip(REMOTE_PREFIX_SEGMENTS).cloned().collect(),
        }))
    }
}

/// Final component of a `/`- or `\`-separated reference.
pub fn basename(reference: &str) -> &str {
    reference
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
}
