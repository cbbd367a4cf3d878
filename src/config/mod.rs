// src/config/mod.rs

//! Configuration loading and validation for styledag.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, falling back to built-in defaults
//!   (`loader.rs`).
//! - Validate globs and numeric ranges (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    CleanSection, ConfigFile, NotifySection, RawConfigFile, StylesSection, WatchSection,
};
