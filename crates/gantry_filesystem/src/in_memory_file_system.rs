use std::collections::HashMap;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::FileSystem;

#[cfg(not(target_os = "windows"))]
fn root_dir() -> PathBuf {
  PathBuf::from("/")
}

#[cfg(target_os = "windows")]
fn root_dir() -> PathBuf {
  PathBuf::from("C:/")
}

/// In memory implementation of a file-system entry
#[derive(Debug)]
enum InMemoryFileSystemEntry {
  File { contents: Vec<u8> },
  Directory,
}

/// In memory implementation of the `FileSystem` trait, for testing purposes.
#[derive(Debug)]
pub struct InMemoryFileSystem {
  files: RwLock<HashMap<PathBuf, InMemoryFileSystemEntry>>,
  current_working_directory: RwLock<PathBuf>,
}

impl Default for InMemoryFileSystem {
  fn default() -> Self {
    Self {
      files: Default::default(),
      current_working_directory: RwLock::new(root_dir()),
    }
  }
}

impl InMemoryFileSystem {
  /// Change the current working directory. Used for resolving relative paths.
  pub fn set_current_working_directory(&self, cwd: &Path) {
    let cwd = self.resolve(cwd);
    let mut state = self.current_working_directory.write();
    *state = cwd;
  }

  pub fn write_file(&self, path: &Path, contents: String) {
    let path = self.resolve(path);

    let mut files = self.files.write();
    if let Some(parent) = path.parent() {
      let mut dir = parent.to_path_buf();
      while files
        .insert(dir.clone(), InMemoryFileSystemEntry::Directory)
        .is_none()
      {
        match dir.parent() {
          Some(parent) => dir = parent.to_path_buf(),
          None => break,
        }
      }
    }

    files.insert(
      path,
      InMemoryFileSystemEntry::File {
        contents: contents.into_bytes(),
      },
    );
  }

  /// Normalizes the path against the current working directory, resolving
  /// `.` and `..` components without touching any real file-system.
  fn resolve(&self, path: &Path) -> PathBuf {
    let path = if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.current_working_directory.read().join(path)
    };

    let mut result = PathBuf::new();
    for component in path.components() {
      match component {
        Component::ParentDir => {
          result.pop();
        }
        Component::CurDir => {}
        component => result.push(component),
      }
    }

    result
  }
}

impl FileSystem for InMemoryFileSystem {
  fn cwd(&self) -> io::Result<PathBuf> {
    Ok(self.current_working_directory.read().clone())
  }

  fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
    Ok(self.resolve(path))
  }

  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    let path = self.resolve(path);
    let files = self.files.read();
    match files.get(&path) {
      None => Err(io::Error::new(io::ErrorKind::NotFound, "File not found")),
      Some(InMemoryFileSystemEntry::File { contents }) => Ok(contents.clone()),
      Some(InMemoryFileSystemEntry::Directory) => Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        "Path is a directory",
      )),
    }
  }

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    let contents = self.read(path)?;
    String::from_utf8(contents).map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))
  }

  fn is_file(&self, path: &Path) -> bool {
    let path = self.resolve(path);
    let files = self.files.read();
    matches!(files.get(&path), Some(InMemoryFileSystemEntry::File { .. }))
  }

  fn is_dir(&self, path: &Path) -> bool {
    let path = self.resolve(path);
    let files = self.files.read();
    matches!(files.get(&path), Some(InMemoryFileSystemEntry::Directory))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn writes_and_reads_files() {
    let fs = InMemoryFileSystem::default();
    let path = PathBuf::from("/project/styles.css");

    fs.write_file(&path, String::from(".a { color: red; }"));

    assert!(fs.is_file(&path));
    assert!(fs.is_dir(Path::new("/project")));
    assert_eq!(fs.read_to_string(&path).unwrap(), ".a { color: red; }");
  }

  #[test]
  fn resolves_relative_paths_against_cwd() {
    let fs = InMemoryFileSystem::default();
    fs.set_current_working_directory(Path::new("/project"));

    fs.write_file(Path::new("styles.css"), String::from("body {}"));

    assert_eq!(
      fs.read_to_string(Path::new("/project/styles.css")).unwrap(),
      "body {}"
    );
  }

  #[test]
  fn resolves_dot_and_parent_components() {
    let fs = InMemoryFileSystem::default();

    fs.write_file(Path::new("/project/a/styles.css"), String::from("a {}"));

    assert_eq!(
      fs.canonicalize(Path::new("/project/b/../a/./styles.css"))
        .unwrap(),
      PathBuf::from("/project/a/styles.css")
    );
  }

  #[test]
  fn read_returns_not_found_for_missing_files() {
    let fs = InMemoryFileSystem::default();

    assert_eq!(
      fs.read(Path::new("/missing.css")).unwrap_err().kind(),
      io::ErrorKind::NotFound
    );
  }
}
