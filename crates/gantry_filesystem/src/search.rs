use std::path::Path;
use std::path::PathBuf;

use crate::FileSystem;

/// Walks up from `from` towards `root` (inclusive), returning the first path
/// that names an existing file matching one of `filenames`.
///
/// Returns `None` when `from` is outside of `root` or no ancestor contains
/// any of the requested files.
pub fn find_ancestor_file(
  fs: &dyn FileSystem,
  filenames: &[&str],
  from: &Path,
  root: &Path,
) -> Option<PathBuf> {
  for dir in from.ancestors() {
    // Don't traverse above the root of the project
    if !dir.starts_with(root) {
      break;
    }

    for filename in filenames {
      let fullpath = dir.join(filename);
      if fs.is_file(&fullpath) {
        return Some(fullpath);
      }
    }
  }

  None
}
