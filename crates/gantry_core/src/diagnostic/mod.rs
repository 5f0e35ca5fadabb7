mod diagnostic;
mod error_kind;

pub use self::diagnostic::*;
pub use self::error_kind::*;
