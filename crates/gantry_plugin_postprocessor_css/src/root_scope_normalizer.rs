use anyhow::Error;
use gantry_core::diagnostic::{Diagnostic, ErrorKind};
use gantry_core::plugin::{PluginContext, PostProcessorPlugin};
use gantry_core::types::Stylesheet;
use serde::Deserialize;

/// The root-scoping pseudo-class preceded by a descendant combinator. When a
/// preprocessor nests `:root` under another selector, declarations intended
/// for the document root end up scoped as descendants; stripping the space
/// restores the intended specificity.
const SCOPED_ROOT: &str = " :root";
const ROOT: &str = ":root";

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ReplaceMode {
  /// Rewrite every occurrence within a selector
  #[default]
  All,
  /// Rewrite only the first occurrence, as a single substring substitution
  /// would
  First,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RootScopeConfig {
  pub replace: ReplaceMode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectConfig {
  root_scope: Option<RootScopeConfig>,
}

/// Rewrites selectors of the form `.scope :root` to `.scope:root` so that
/// root-level declarations apply at the intended specificity instead of
/// being scoped as descendants.
#[derive(Debug)]
pub struct RootScopeNormalizerPlugin {
  replace: ReplaceMode,
}

impl RootScopeNormalizerPlugin {
  pub fn new(ctx: &PluginContext) -> Result<Self, Error> {
    let config = ctx.config.load_project_config::<ProjectConfig>().map_or_else(
      |err| {
        let diagnostic = err.downcast_ref::<Diagnostic>();

        if diagnostic.is_some_and(|d| d.kind != ErrorKind::NotFound) {
          return Err(err);
        }

        Ok(RootScopeConfig::default())
      },
      |config| Ok(config.contents.root_scope.unwrap_or_default()),
    )?;

    Ok(RootScopeNormalizerPlugin {
      replace: config.replace,
    })
  }
}

/// Returns the rewritten selector, or `None` when the selector does not
/// contain the pattern. Total over any input string.
fn normalize_selector(selector: &str, replace: ReplaceMode) -> Option<String> {
  match replace {
    ReplaceMode::First => selector.find(SCOPED_ROOT).map(|index| {
      let mut rewritten = String::with_capacity(selector.len());
      rewritten.push_str(&selector[..index]);
      rewritten.push_str(ROOT);
      rewritten.push_str(&selector[index + SCOPED_ROOT.len()..]);
      rewritten
    }),
    ReplaceMode::All => {
      if !selector.contains(SCOPED_ROOT) {
        return None;
      }

      // Run to a fixpoint so runs of spaces before the token collapse too,
      // keeping the rewrite idempotent. Each pass shortens the selector, so
      // this terminates.
      let mut rewritten = selector.replace(SCOPED_ROOT, ROOT);
      while rewritten.contains(SCOPED_ROOT) {
        rewritten = rewritten.replace(SCOPED_ROOT, ROOT);
      }

      Some(rewritten)
    }
  }
}

impl PostProcessorPlugin for RootScopeNormalizerPlugin {
  fn name(&self) -> &str {
    "css-root-scope"
  }

  fn transform(&mut self, stylesheet: &mut Stylesheet) -> Result<(), Error> {
    let replace = self.replace;

    stylesheet.walk_rules_mut(|rule| {
      if let Some(rewritten) = normalize_selector(&rule.selector, replace) {
        tracing::debug!(
          from = %rule.selector,
          to = %rewritten,
          "normalized root-scoped selector"
        );
        rule.selector = rewritten;
      }
    });

    Ok(())
  }
}
