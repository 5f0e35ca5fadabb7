use std::fmt::Debug;

use crate::types::Stylesheet;

/// Rewrite a parsed stylesheet in place during the post-processing phase
///
/// Post-processors run after preprocessing and before emission. Each plugin
/// receives the parsed root node and mutates it in place; the host hands the
/// same document to the next plugin in the pipeline. Implementations must
/// preserve rule order and must not inspect or alter declaration blocks they
/// do not own. I/O belongs in the constructor, not in `transform`.
pub trait PostProcessorPlugin: Debug + Send + Sync {
  /// Identifier used in pipeline configuration and logs
  fn name(&self) -> &str;

  /// Transform the stylesheet in place
  fn transform(&mut self, stylesheet: &mut Stylesheet) -> Result<(), anyhow::Error>;
}
