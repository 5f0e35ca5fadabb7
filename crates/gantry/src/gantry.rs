use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use gantry_config::{ConfigRequest, GantryConfig, GantryRcConfigLoader};
use gantry_core::config_loader::ConfigLoader;
use gantry_core::plugin::{PluginContext, PluginLogger, PluginOptions, PostProcessorPlugin};
use gantry_core::project_path::to_project_path;
use gantry_core::types::{LogLevel, Stylesheet};
use gantry_filesystem::FileSystemRef;

use crate::plugins;

/// One build invocation's post-processing stage.
///
/// Owns the resolved configuration and the instantiated plugin pipeline.
/// Stylesheets are processed independently; nothing is carried over between
/// calls.
pub struct Gantry {
  pub config: GantryConfig,
  fs: FileSystemRef,
  plugins: Vec<Box<dyn PostProcessorPlugin>>,
}

impl Gantry {
  pub fn new(request: ConfigRequest, fs: FileSystemRef) -> Result<Self, anyhow::Error> {
    let config = GantryRcConfigLoader::new(fs.clone()).load(&request)?;

    tracing::info!(
      mode = %config.mode,
      command = %config.command,
      "resolved build configuration"
    );

    let env: BTreeMap<String, String> = std::env::vars()
      .filter(|(key, _)| {
        config
          .env_prefixes
          .iter()
          .any(|prefix| key.starts_with(prefix.as_str()))
      })
      .collect();

    let ctx = PluginContext {
      config: Arc::new(ConfigLoader {
        fs: fs.clone(),
        project_root: config.project_root.clone(),
        search_path: config.source_root.clone(),
      }),
      file_system: fs.clone(),
      logger: PluginLogger::default(),
      options: Arc::new(PluginOptions {
        env,
        log_level: LogLevel::default(),
        mode: config.mode.clone(),
        command: config.command,
        project_root: config.project_root.clone(),
      }),
    };

    let plugins = plugins::post_processors(&config.post_processors, &ctx)?;

    Ok(Gantry {
      config,
      fs,
      plugins,
    })
  }

  /// Runs the post-processor pipeline over one stylesheet's source text.
  pub fn process_source(&mut self, code: &str) -> Result<String, anyhow::Error> {
    let mut stylesheet = Stylesheet::parse(code)?;

    for plugin in self.plugins.iter_mut() {
      tracing::debug!(plugin = plugin.name(), "running post-processor");
      plugin.transform(&mut stylesheet)?;
    }

    Ok(stylesheet.to_css())
  }

  /// Reads a stylesheet through the invocation's file-system handle and
  /// runs the pipeline over it.
  pub fn process_stylesheet(&mut self, path: &Path) -> Result<String, anyhow::Error> {
    let display_path = to_project_path(&self.config.project_root, path);

    let code = self
      .fs
      .read_to_string(path)
      .with_context(|| format!("Failed to read {}", display_path.display()))?;

    self
      .process_source(&code)
      .with_context(|| format!("Failed to post-process {}", display_path.display()))
  }
}
