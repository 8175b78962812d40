//! Configuration loading, validation and CLI overrides for hyauth.

mod cli;
mod defaults;
mod loader;
mod types;
mod validate;

pub use cli::{CliOverrides, apply_overrides};
pub use loader::{ConfigError, load_config, load_config_or_default};
pub use types::*;
pub use validate::validate_config;
