use std::path::PathBuf;

use gantry_core::diagnostic::DiagnosticError;
use gantry_core::diagnostic_error;
use gantry_core::types::{AliasList, BuildCommand, BuildMode};
use serde::Deserialize;
use serde::Serialize;

use crate::gantry_rc_config_loader::GantryRc;

/// A named post-processor in the pipeline, in execution order
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginNode {
  pub name: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
  pub strict_port: bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: String::from("0.0.0.0"),
      port: 8080,
      strict_port: true,
    }
  }
}

/// The named inputs a build invocation starts from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigRequest {
  pub mode: BuildMode,
  pub command: BuildCommand,
  pub project_root: PathBuf,
}

/// The fully resolved configuration of one build invocation.
///
/// Constructed once at invocation start from a [`ConfigRequest`] and an
/// optional rc file, then passed by reference to whichever stage needs it.
/// Nothing reads configuration from ambient globals.
///
/// Several fields are declarative data for the host bundler rather than
/// behavior of this crate: alias entries and dedupe lists belong to the host
/// resolver, watch-ignore globs to the host watcher, and the output settings
/// to the host emitter.
#[derive(Clone, Debug, PartialEq)]
pub struct GantryConfig {
  pub mode: BuildMode,
  pub command: BuildCommand,
  pub project_root: PathBuf,

  /// Directory the bundler roots the page at
  pub source_root: PathBuf,
  /// Static-asset directory, selected by mode
  pub public_dir: PathBuf,
  /// Output tree of the separately compiled front-end, selected by mode
  pub compiled_modules_dir: PathBuf,

  /// Environment-variable prefixes exposed to the application
  pub env_prefixes: Vec<String>,
  pub aliases: AliasList,
  pub dedupe: Vec<String>,

  pub server: ServerConfig,
  pub watch_ignore: Vec<String>,

  pub out_dir: PathBuf,
  pub chunk_size_warning_limit: u32,

  /// The stylesheet post-processing pipeline, in order
  pub post_processors: Vec<PluginNode>,
}

impl GantryConfig {
  /// Resolves a request and an rc file into a validated configuration.
  ///
  /// Relative paths in the rc file are resolved against the project root.
  /// Mode-dependent directories are selected here so downstream stages never
  /// branch on the mode themselves.
  pub fn new(request: &ConfigRequest, rc: GantryRc) -> Result<Self, DiagnosticError> {
    let is_production = request.mode == BuildMode::Production;
    let root = &request.project_root;

    let public_dirs = rc.public_dir.unwrap_or_default();
    let public_dir = if is_production {
      public_dirs.production
    } else {
      public_dirs.development
    };

    let compiled = rc.compiled_modules.unwrap_or_default();
    let compiled_modules_dir = if is_production {
      compiled.optimized
    } else {
      compiled.development
    };

    let server = rc.server.unwrap_or_default();
    if server.port == 0 {
      return Err(diagnostic_error!(
        "Invalid server port 0, expected a port in 1..=65535"
      ));
    }

    let chunk_size_warning_limit = rc.chunk_size_warning_limit.unwrap_or(20000);
    if chunk_size_warning_limit == 0 {
      return Err(diagnostic_error!(
        "Invalid chunkSizeWarningLimit 0, expected a positive size in kilobytes"
      ));
    }

    let post_processors = match rc.post_processors {
      None => vec![PluginNode {
        name: String::from("css-root-scope"),
      }],
      Some(names) if names.is_empty() => {
        return Err(diagnostic_error!(
          "Post-processor pipeline is configured but names no plugins"
        ));
      }
      Some(names) => names.into_iter().map(|name| PluginNode { name }).collect(),
    };

    Ok(GantryConfig {
      mode: request.mode.clone(),
      command: request.command,
      project_root: root.clone(),
      source_root: root.join(rc.source_root.unwrap_or_else(|| PathBuf::from("src/webapp"))),
      public_dir: root.join(public_dir),
      compiled_modules_dir: root.join(compiled_modules_dir),
      env_prefixes: rc
        .env_prefixes
        .unwrap_or_else(|| vec![String::from("GANTRY_")]),
      aliases: rc.aliases.unwrap_or_default(),
      dedupe: rc.dedupe.unwrap_or_default(),
      server,
      watch_ignore: rc
        .watch_ignore
        .unwrap_or_else(|| vec![String::from("**/*.tmp")]),
      out_dir: root.join(rc.out_dir.unwrap_or_else(|| PathBuf::from("dist"))),
      chunk_size_warning_limit,
      post_processors,
    })
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  mod new {
    use pretty_assertions::assert_eq;

    use super::*;

    fn request(mode: BuildMode) -> ConfigRequest {
      ConfigRequest {
        mode,
        command: BuildCommand::Build,
        project_root: PathBuf::from("/app"),
      }
    }

    #[test]
    fn selects_development_directories_by_default() {
      let config = GantryConfig::new(&request(BuildMode::Development), GantryRc::default())
        .unwrap();

      assert_eq!(config.public_dir, PathBuf::from("/app/public/dev"));
      assert_eq!(
        config.compiled_modules_dir,
        PathBuf::from("/app/target/modules/dev")
      );
    }

    #[test]
    fn selects_production_directories_in_production_mode() {
      let config =
        GantryConfig::new(&request(BuildMode::Production), GantryRc::default()).unwrap();

      assert_eq!(config.public_dir, PathBuf::from("/app/public"));
      assert_eq!(
        config.compiled_modules_dir,
        PathBuf::from("/app/target/modules/opt")
      );
    }

    #[test]
    fn treats_custom_modes_as_development() {
      let config = GantryConfig::new(
        &request(BuildMode::Other(String::from("staging"))),
        GantryRc::default(),
      )
      .unwrap();

      assert_eq!(config.public_dir, PathBuf::from("/app/public/dev"));
    }

    #[test]
    fn defaults_the_post_processor_pipeline() {
      let config = GantryConfig::new(&request(BuildMode::Development), GantryRc::default())
        .unwrap();

      assert_eq!(
        config.post_processors,
        vec![PluginNode {
          name: String::from("css-root-scope")
        }]
      );
    }

    #[test]
    fn rejects_an_empty_post_processor_pipeline() {
      let rc = GantryRc {
        post_processors: Some(Vec::new()),
        ..GantryRc::default()
      };

      assert_eq!(
        GantryConfig::new(&request(BuildMode::Development), rc)
          .map_err(|error| error.to_string()),
        Err(String::from(
          "Post-processor pipeline is configured but names no plugins"
        ))
      );
    }

    #[test]
    fn rejects_port_zero() {
      let rc = GantryRc {
        server: Some(ServerConfig {
          port: 0,
          ..ServerConfig::default()
        }),
        ..GantryRc::default()
      };

      assert_eq!(
        GantryConfig::new(&request(BuildMode::Development), rc)
          .map_err(|error| error.to_string()),
        Err(String::from(
          "Invalid server port 0, expected a port in 1..=65535"
        ))
      );
    }
  }
}
