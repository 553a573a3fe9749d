//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML file from the platform config
//! directory (or an explicit `--config` path), falls back to defaults when
//! the file does not exist yet, and can write a starter file for
//! `web-remote --init-config`.

pub mod config;

pub use config::{config_file_path, load_config, save_config, ConfigError, FileConfig};
