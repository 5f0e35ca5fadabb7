use serde::Deserialize;
use serde::Serialize;

/// Broad classification of a [`super::Diagnostic`], used by callers that
/// need to branch on recoverable cases such as a missing config file.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
  NotFound,
  ParseError,
  #[default]
  Unknown,
}
