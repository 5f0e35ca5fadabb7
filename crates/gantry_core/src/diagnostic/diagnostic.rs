use std::fmt::Display;
use std::fmt::Formatter;

use derive_builder::Builder;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ErrorKind;

/// Convenience alias for errors that carry a [`Diagnostic`] payload.
pub type DiagnosticError = anyhow::Error;

/// This is a user facing error for Gantry.
///
/// Carried inside an `anyhow::Error` across plugin and pipeline boundaries;
/// recover it with `error.downcast_ref::<Diagnostic>()`.
#[derive(Builder, Error, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[builder(default, setter(into))]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
  /// A summary user-facing message
  pub message: String,

  #[serde(default)]
  pub kind: ErrorKind,

  /// Indicates where this diagnostic was emitted from
  #[builder(setter(into, strip_option))]
  pub origin: Option<String>,

  /// Hints for the user
  #[builder(setter(into, strip_option))]
  pub hints: Option<Vec<String>>,
}

impl Display for Diagnostic {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.message)
  }
}

/// Creates an `anyhow::Error` wrapping a [`Diagnostic`], either from a
/// format string or from a [`DiagnosticBuilder`].
#[macro_export]
macro_rules! diagnostic_error {
  ($message:literal $(, $args:expr)* $(,)?) => {
    $crate::diagnostic_error!($crate::diagnostic::DiagnosticBuilder::default()
      .message(format!($message $(, $args)*)))
  };
  ($builder:expr) => {{
    let diagnostic = $builder.build().unwrap_or_else(|error| $crate::diagnostic::Diagnostic {
      message: error.to_string(),
      ..Default::default()
    });

    ::anyhow::Error::from(diagnostic)
  }};
}
