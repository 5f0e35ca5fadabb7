use std::path::{Path, PathBuf};

/// Converts the path so that it is relative to the project root
pub fn to_project_path(project_root: &Path, file_path: &Path) -> PathBuf {
  file_path
    .strip_prefix(project_root)
    .unwrap_or(file_path)
    .to_path_buf()
}
