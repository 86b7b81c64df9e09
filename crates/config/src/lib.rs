//! Configuration loading, env substitution, and validation.
//!
//! Config files: `skillsync.toml`, `skillsync.yaml`, or `skillsync.json`
//! Searched in `./` then `~/.config/skillsync/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{
        clear_config_dir, clear_data_dir, config_dir, data_dir, discover_and_load,
        find_config_file, load_config, set_config_dir, set_data_dir, target_dir,
    },
    schema::{InstallConfig, MarkerPolicy, RegistryConfig, SkillsyncConfig},
    validate::{Diagnostic, Severity, ValidationResult},
};
