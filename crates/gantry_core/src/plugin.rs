use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use gantry_filesystem::FileSystemRef;
pub use post_processor_plugin::*;

use crate::config_loader::ConfigLoaderRef;
use crate::types::{BuildCommand, BuildMode, LogLevel};

mod post_processor_plugin;

/// Construction-time context handed to each plugin by the host pipeline
pub struct PluginContext {
  pub config: ConfigLoaderRef,
  pub file_system: FileSystemRef,
  pub logger: PluginLogger,
  pub options: Arc<PluginOptions>,
}

#[derive(Default)]
pub struct PluginLogger {}

#[derive(Debug, Default)]
pub struct PluginOptions {
  /// Environment variables exposed to plugins
  pub env: BTreeMap<String, String>,
  pub log_level: LogLevel,
  pub mode: BuildMode,
  pub command: BuildCommand,
  pub project_root: PathBuf,
}
