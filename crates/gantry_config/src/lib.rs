pub use gantry_config::*;
pub use gantry_rc_config_loader::*;

mod gantry_config;
mod gantry_rc_config_loader;
