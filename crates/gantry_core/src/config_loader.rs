use std::path::PathBuf;
use std::sync::Arc;

use gantry_filesystem::search::find_ancestor_file;
use gantry_filesystem::FileSystemRef;
use serde::de::DeserializeOwned;

use crate::diagnostic::{DiagnosticBuilder, DiagnosticError, ErrorKind};
use crate::diagnostic_error;

pub type ConfigLoaderRef = Arc<ConfigLoader>;

/// The name of the project-level configuration file
pub const CONFIG_FILE_NAME: &str = "gantry.config.json";

/// Locates and deserializes JSON configuration files, searching upward from
/// a starting directory to the project root.
#[derive(Debug)]
pub struct ConfigLoader {
  pub fs: FileSystemRef,
  pub project_root: PathBuf,
  pub search_path: PathBuf,
}

#[derive(Debug, PartialEq)]
pub struct ConfigFile<T> {
  pub contents: T,
  pub path: PathBuf,
  pub raw: String,
}

impl ConfigLoader {
  pub fn load_json_config<Config: DeserializeOwned>(
    &self,
    filename: &str,
  ) -> Result<ConfigFile<Config>, DiagnosticError> {
    let path = find_ancestor_file(
      &*self.fs,
      &[filename],
      &self.search_path,
      &self.project_root,
    )
    .ok_or_else(|| {
      diagnostic_error!(DiagnosticBuilder::default()
        .kind(ErrorKind::NotFound)
        .message(format!(
          "Unable to locate {filename} config file from {}",
          self.search_path.display()
        )))
    })?;

    let code = self.fs.read_to_string(&path)?;

    let contents = serde_json::from_str::<Config>(&code).map_err(|error| {
      diagnostic_error!(DiagnosticBuilder::default()
        .kind(ErrorKind::ParseError)
        .message(format!("Error parsing {}: {error}", path.display())))
    })?;

    tracing::debug!(path = %path.display(), "loaded config file");

    Ok(ConfigFile {
      contents,
      path,
      raw: code,
    })
  }

  /// Loads the project-level `gantry.config.json`, used by plugins to read
  /// their own configuration sections
  pub fn load_project_config<Config: DeserializeOwned>(
    &self,
  ) -> Result<ConfigFile<Config>, DiagnosticError> {
    self.load_json_config::<Config>(CONFIG_FILE_NAME)
  }
}

#[cfg(test)]
mod tests {
  use gantry_filesystem::in_memory_file_system::InMemoryFileSystem;

  use super::*;

  mod load_json_config {
    use std::sync::Arc;

    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct JsonConfig {}

    #[test]
    fn returns_an_error_when_the_config_does_not_exist() {
      let project_root = PathBuf::from("/project-root");
      let search_path = project_root.join("styles");

      let config = ConfigLoader {
        fs: Arc::new(InMemoryFileSystem::default()),
        project_root,
        search_path: search_path.clone(),
      };

      assert_eq!(
        config
          .load_json_config::<JsonConfig>("config.json")
          .map_err(|err| err.to_string()),
        Err(format!(
          "Unable to locate config.json config file from {}",
          search_path.display()
        ))
      )
    }

    #[test]
    fn returns_not_found_kind_for_missing_configs() {
      let project_root = PathBuf::from("/project-root");

      let config = ConfigLoader {
        fs: Arc::new(InMemoryFileSystem::default()),
        project_root: project_root.clone(),
        search_path: project_root,
      };

      let error = config
        .load_json_config::<JsonConfig>("config.json")
        .unwrap_err();

      assert_eq!(
        error
          .downcast_ref::<crate::diagnostic::Diagnostic>()
          .map(|diagnostic| diagnostic.kind),
        Some(ErrorKind::NotFound)
      );
    }

    #[test]
    fn returns_an_error_when_the_config_is_malformed() {
      let fs = Arc::new(InMemoryFileSystem::default());
      let project_root = PathBuf::from("/project-root");
      let config_path = project_root.join("config.json");

      fs.write_file(&config_path, String::from("{invalid json"));

      let config = ConfigLoader {
        fs,
        project_root: project_root.clone(),
        search_path: project_root,
      };

      let error = config
        .load_json_config::<JsonConfig>("config.json")
        .unwrap_err();

      assert_eq!(
        error
          .downcast_ref::<crate::diagnostic::Diagnostic>()
          .map(|diagnostic| diagnostic.kind),
        Some(ErrorKind::ParseError)
      );
    }

    #[test]
    fn returns_json_config_at_search_path() {
      let fs = Arc::new(InMemoryFileSystem::default());
      let project_root = PathBuf::from("/project-root");
      let search_path = project_root.join("styles");
      let config_path = search_path.join("config.json");

      fs.write_file(&config_path, String::from("{}"));

      let config = ConfigLoader {
        fs,
        project_root,
        search_path,
      };

      assert_eq!(
        config
          .load_json_config::<JsonConfig>("config.json")
          .map_err(|err| err.to_string()),
        Ok(ConfigFile {
          path: config_path,
          contents: JsonConfig {},
          raw: String::from("{}")
        })
      )
    }

    #[test]
    fn returns_json_config_at_project_root() {
      let fs = Arc::new(InMemoryFileSystem::default());
      let project_root = PathBuf::from("/project-root");
      let search_path = project_root.join("styles");
      let config_path = project_root.join("config.json");

      fs.write_file(&config_path, String::from("{}"));

      let config = ConfigLoader {
        fs,
        project_root,
        search_path,
      };

      assert_eq!(
        config
          .load_json_config::<JsonConfig>("config.json")
          .map_err(|err| err.to_string()),
        Ok(ConfigFile {
          path: config_path,
          contents: JsonConfig {},
          raw: String::from("{}")
        })
      )
    }
  }

  mod load_project_config {
    use std::sync::Arc;

    use super::*;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct RootScopeSection {
      replace: String,
    }

    #[derive(Debug, PartialEq, serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ProjectConfig {
      root_scope: RootScopeSection,
    }

    #[test]
    fn returns_typed_sections_from_the_project_config() {
      let fs = Arc::new(InMemoryFileSystem::default());
      let project_root = PathBuf::from("/project-root");

      fs.write_file(
        &project_root.join(CONFIG_FILE_NAME),
        String::from(r#"{ "rootScope": { "replace": "first" } }"#),
      );

      let config = ConfigLoader {
        fs,
        project_root: project_root.clone(),
        search_path: project_root.join("styles"),
      };

      assert_eq!(
        config
          .load_project_config::<ProjectConfig>()
          .map(|config| config.contents)
          .map_err(|err| err.to_string()),
        Ok(ProjectConfig {
          root_scope: RootScopeSection {
            replace: String::from("first")
          }
        })
      )
    }
  }
}
