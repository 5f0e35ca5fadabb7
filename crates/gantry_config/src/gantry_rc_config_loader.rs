use std::path::PathBuf;

use gantry_core::config_loader::CONFIG_FILE_NAME;
use gantry_core::diagnostic::{DiagnosticBuilder, DiagnosticError, ErrorKind};
use gantry_core::diagnostic_error;
use gantry_core::types::AliasList;
use gantry_filesystem::FileSystemRef;
use serde::Deserialize;

use crate::gantry_config::{ConfigRequest, GantryConfig, ServerConfig};

/// The raw, optional `gantry.config.json` file.
///
/// Every field is optional; [`GantryConfig::new`] fills in the defaults and
/// validates the result. Plugin-specific sections (for example `rootScope`)
/// live in the same file but are read by the plugins themselves through the
/// config loader, so unknown fields are accepted here.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GantryRc {
  pub source_root: Option<PathBuf>,
  pub public_dir: Option<PublicDirs>,
  pub compiled_modules: Option<CompiledModulesDirs>,
  pub env_prefixes: Option<Vec<String>>,
  pub aliases: Option<AliasList>,
  pub dedupe: Option<Vec<String>>,
  pub server: Option<ServerConfig>,
  pub watch_ignore: Option<Vec<String>>,
  pub out_dir: Option<PathBuf>,
  pub chunk_size_warning_limit: Option<u32>,
  pub post_processors: Option<Vec<String>>,
}

/// Static-asset directories per mode
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicDirs {
  pub production: PathBuf,
  pub development: PathBuf,
}

impl Default for PublicDirs {
  fn default() -> Self {
    Self {
      production: PathBuf::from("public"),
      development: PathBuf::from("public/dev"),
    }
  }
}

/// Output trees of the separately compiled front-end, per mode
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompiledModulesDirs {
  pub optimized: PathBuf,
  pub development: PathBuf,
}

impl Default for CompiledModulesDirs {
  fn default() -> Self {
    Self {
      optimized: PathBuf::from("target/modules/opt"),
      development: PathBuf::from("target/modules/dev"),
    }
  }
}

/// Loads `gantry.config.json` from the project root and resolves it, with
/// the request, into a [`GantryConfig`].
pub struct GantryRcConfigLoader {
  fs: FileSystemRef,
}

impl GantryRcConfigLoader {
  pub fn new(fs: FileSystemRef) -> Self {
    GantryRcConfigLoader { fs }
  }

  pub fn load(&self, request: &ConfigRequest) -> Result<GantryConfig, DiagnosticError> {
    let path = request.project_root.join(CONFIG_FILE_NAME);

    let rc = if self.fs.is_file(&path) {
      let raw = self.fs.read_to_string(&path)?;

      // JSON5 so rc files may carry comments and trailing commas
      serde_json5::from_str::<GantryRc>(&raw).map_err(|error| {
        diagnostic_error!(DiagnosticBuilder::default()
          .kind(ErrorKind::ParseError)
          .message(format!("Error parsing {}: {error}", path.display())))
      })?
    } else {
      tracing::debug!(path = %path.display(), "no rc file found, using defaults");
      GantryRc::default()
    };

    GantryConfig::new(request, rc)
  }
}
