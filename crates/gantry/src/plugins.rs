use gantry_config::PluginNode;
use gantry_core::diagnostic::DiagnosticBuilder;
use gantry_core::diagnostic_error;
use gantry_core::plugin::{PluginContext, PostProcessorPlugin};
use gantry_plugin_postprocessor_css::RootScopeNormalizerPlugin;

/// Instantiates the configured post-processor pipeline, in order.
pub fn post_processors(
  nodes: &[PluginNode],
  ctx: &PluginContext,
) -> Result<Vec<Box<dyn PostProcessorPlugin>>, anyhow::Error> {
  nodes
    .iter()
    .map(|node| match node.name.as_str() {
      "css-root-scope" => {
        Ok(Box::new(RootScopeNormalizerPlugin::new(ctx)?) as Box<dyn PostProcessorPlugin>)
      }
      name => Err(diagnostic_error!(DiagnosticBuilder::default()
        .message(format!("Unknown post-processor plugin {name}"))
        .hints(vec![String::from("available plugins: css-root-scope")]))),
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;
  use std::sync::Arc;

  use gantry_core::config_loader::ConfigLoader;
  use gantry_core::plugin::{PluginLogger, PluginOptions};
  use gantry_filesystem::in_memory_file_system::InMemoryFileSystem;

  use super::*;

  fn make_context() -> PluginContext {
    let file_system = Arc::new(InMemoryFileSystem::default());

    PluginContext {
      config: Arc::new(ConfigLoader {
        fs: file_system.clone(),
        project_root: PathBuf::default(),
        search_path: PathBuf::default(),
      }),
      file_system,
      logger: PluginLogger::default(),
      options: Arc::new(PluginOptions::default()),
    }
  }

  #[test]
  fn builds_the_configured_pipeline_in_order() {
    let nodes = vec![PluginNode {
      name: String::from("css-root-scope"),
    }];

    let plugins = post_processors(&nodes, &make_context()).unwrap();

    assert_eq!(plugins.len(), 1);
    assert_eq!(plugins[0].name(), "css-root-scope");
  }

  #[test]
  fn rejects_unknown_plugin_names() {
    let nodes = vec![PluginNode {
      name: String::from("css-minify"),
    }];

    assert_eq!(
      post_processors(&nodes, &make_context())
        .map(|_| ())
        .map_err(|error| error.to_string()),
      Err(String::from("Unknown post-processor plugin css-minify"))
    );
  }
}
