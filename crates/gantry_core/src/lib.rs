pub mod config_loader;
pub mod diagnostic;
pub mod plugin;
pub mod project_path;
pub mod types;
