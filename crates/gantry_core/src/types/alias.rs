use serde::Deserialize;
use serde::Serialize;

/// A module specifier rewrite handed to the host resolver.
///
/// Entries are ordered; the host applies the first matching `find`.
/// Resolving specifiers is the host's concern, these are configuration data.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasEntry {
  pub find: String,
  pub replacement: String,
}

pub type AliasList = Vec<AliasEntry>;
