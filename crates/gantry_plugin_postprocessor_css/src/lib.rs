pub use root_scope_normalizer::*;

mod root_scope_normalizer;
