//! Global configuration types for Persona.
//!
//! `GlobalConfig` represents the top-level `config.toml` in the data
//! directory. Every field has a default, so an empty file is valid.

use serde::{Deserialize, Serialize};

use crate::profile::Profile;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// SQLite file name, relative to the data directory.
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// First-run bootstrap policy.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

fn default_database_file() -> String {
    "persona.db".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            bootstrap: BootstrapConfig::default(),
        }
    }
}

/// Profile inserted when the store is empty on first run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Set to `false` to start with no profile at all.
    pub enabled: bool,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone_number: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            first_name: "Emmanuel".to_string(),
            last_name: "Oyiboke".to_string(),
            address: "Nigeria".to_string(),
            phone_number: "+78117325298".to_string(),
        }
    }
}

impl BootstrapConfig {
    /// The profile to seed, or `None` when bootstrap is disabled.
    pub fn seed(&self) -> Option<Profile> {
        self.enabled.then(|| {
            Profile::new(
                self.first_name.clone(),
                self.last_name.clone(),
                self.address.clone(),
                self.phone_number.clone(),
            )
        })
    }
}
