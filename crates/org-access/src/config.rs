//! Registry configuration.
//!
//! Decides where role definitions come from. Configuration is loaded from
//! environment variables; without any, the built-in roles are used.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::error::AccessResult;
use crate::registry::RoleRegistry;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Role definitions file could not be read.
    #[error("Failed to read role definitions from {path}: {source}")]
    ReadRolesFile {
        /// Path that was read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Where the role registry comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// JSON file of role definitions. `None` means built-in roles only.
    pub roles_file: Option<PathBuf>,

    /// Layer file-defined roles over the built-in roles instead of
    /// replacing them.
    pub include_default_roles: bool,
}

impl AccessConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ORG_ACCESS_ROLES_FILE`: Path to a JSON role definitions file
    /// - `ORG_ACCESS_INCLUDE_DEFAULT_ROLES`: Keep built-in roles alongside
    ///   file-defined ones (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        let roles_file = std::env::var("ORG_ACCESS_ROLES_FILE")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let include_default_roles = match std::env::var("ORG_ACCESS_INCLUDE_DEFAULT_ROLES") {
            Ok(value) => parse_bool("ORG_ACCESS_INCLUDE_DEFAULT_ROLES", &value)?,
            Err(_) => false,
        };

        Ok(Self {
            roles_file,
            include_default_roles,
        })
    }

    /// Build the registry described by this configuration.
    pub fn load_registry(&self) -> AccessResult<RoleRegistry> {
        let Some(path) = &self.roles_file else {
            tracing::debug!("No roles file configured, using built-in roles");
            return Ok(RoleRegistry::builtin().clone());
        };

        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadRolesFile {
            path: path.clone(),
            source,
        })?;
        let custom = RoleRegistry::from_json(&json)?;

        if self.include_default_roles {
            Ok(RoleRegistry::builtin().clone().overlay(custom))
        } else {
            Ok(custom)
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got {value:?}"),
        }),
    }
}
