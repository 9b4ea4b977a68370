//! Shelternet server: configuration and HTTP bootstrap.

pub mod config;
pub mod server;

pub use config::{ConfigError, ConfigOverrides, ServerConfig, DEFAULT_CONFIG_FILE};
