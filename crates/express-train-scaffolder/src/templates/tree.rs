//! Directory creation from a `DirectoryTree`

use crate::error::{Result, ScaffoldError};
use crate::templates::manifest::DirectoryTree;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Create every directory of `tree` under `root`.
///
/// Directories that already exist are left alone. Returns the relative paths
/// in creation order.
pub async fn build_tree(tree: &DirectoryTree, root: &Path) -> Result<Vec<PathBuf>> {
    let paths = tree.paths();
    for relative in &paths {
        let dir = root.join(relative);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| ScaffoldError::io(&dir, e))?;
        tracing::debug!(path = %dir.display(), "created directory");
    }
    Ok(paths)
}
