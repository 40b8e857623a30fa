use std::path::{Path, PathBuf};

/// Converts a path to an absolute one for diagnostics.
///
/// Paths with parent references are canonicalized when possible; everything
/// else is joined onto the current directory. If the current directory is
/// unavailable the path is returned as is.
pub fn to_absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let current_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("Failed to get current directory: {}, using path as is", e);
            return path.to_path_buf();
        }
    };

    let has_parent_refs = path
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir));

    if has_parent_refs {
        match current_dir.join(path).canonicalize() {
            Ok(canonical_path) => canonical_path,
            Err(e) => {
                log::debug!("Failed to canonicalize {}: {}, using simple join", path.display(), e);
                current_dir.join(path)
            }
        }
    } else {
        current_dir.join(path)
    }
}
