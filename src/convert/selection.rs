use crate::path::valid_path;
use crate::types::MeshAsset;

/// Indices of the submeshes to export for `target_path`.
///
/// Exporters sometimes split one asset into per-submesh files whose prim
/// path already names the submesh. When the lower-cased target path contains
/// any submesh name, only the named submeshes are exported; otherwise all
/// are. A single-submesh asset always exports its one submesh.
pub fn select_submeshes(asset: &MeshAsset, target_path: &str) -> Vec<usize> {
    let count = asset.submesh_count();
    if count <= 1 {
        return (0..count).collect();
    }

    let path_lower = target_path.to_lowercase();
    let named: Vec<bool> = asset
        .submeshes
        .iter()
        .map(|s| path_lower.contains(&s.name.to_lowercase()))
        .collect();

    if named.iter().any(|&n| n) {
        (0..count).filter(|&i| named[i]).collect()
    } else {
        (0..count).collect()
    }
}

/// Prim path for one submesh under the caller's target path.
pub fn submesh_prim_path(target_path: &str, submesh_name: &str) -> String {
    let mut path = valid_path(&format!("{target_path}/{submesh_name}"));
    if path.ends_with('/') {
        path.pop();
    }
    path
}
