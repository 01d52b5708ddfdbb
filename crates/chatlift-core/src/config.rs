//! Typed configuration for a migration run.
//!
//! Configuration is loaded once from a TOML file and threaded through
//! constructors; there is no ambient global state.

use crate::error::{ChatliftError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration for one migration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// The platform conversations are migrated from.
    pub source: SourceConfig,
    /// The platform conversations are migrated to.
    pub destination: DestinationConfig,
    /// Run-level settings (file paths, throttling).
    #[serde(default)]
    pub run: RunConfig,
}

/// Connection settings for the source platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub base_url: String,
    pub api_token: String,
}

/// Connection settings and fallback identities for the destination platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    pub base_url: String,
    pub api_token: String,
    /// Agent id substituted when a source agent cannot be mapped.
    pub fallback_agent_id: String,
    /// Channel id substituted when a source channel cannot be mapped.
    pub default_channel_id: String,
    /// Actor id given to messages whose sender is not the migrated user.
    pub fixed_actor_id: String,
    /// Actor type given to messages that carry none.
    pub fixed_actor_type: String,
}

/// Run-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Path of the source roster file.
    #[serde(default = "default_roster_path")]
    pub roster_path: PathBuf,
    /// Path of the destination contact registry file.
    #[serde(default = "default_registry_path")]
    pub registry_path: PathBuf,
    /// Delay applied after each conversation and after each user.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

fn default_roster_path() -> PathBuf {
    PathBuf::from("data/source_contacts.csv")
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("data/destination_contacts.csv")
}

fn default_request_delay_ms() -> u64 {
    1000
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            roster_path: default_roster_path(),
            registry_path: default_registry_path(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

impl RunConfig {
    /// The inter-request delay as a [`Duration`].
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl MigrationConfig {
    /// Loads the configuration from a TOML file.
    ///
    /// # Returns
    ///
    /// - `Ok(MigrationConfig)`: the file was read and parsed.
    /// - `Err(_)`: the file is missing, unreadable, or not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChatliftError::config(format!("failed to read config file at {:?}: {}", path, e))
        })?;
        let config: MigrationConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
[source]
base_url = "https://source.example.com"
api_token = "src-token"

[destination]
base_url = "https://dest.example.com"
api_token = "dst-token"
fallback_agent_id = "agent-0"
default_channel_id = "channel-0"
fixed_actor_id = "actor-0"
fixed_actor_type = "agent"
"#;

    #[test]
    fn test_minimal_config_uses_run_defaults() {
        let config: MigrationConfig = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.run.request_delay_ms, 1000);
        assert_eq!(config.run.roster_path, PathBuf::from("data/source_contacts.csv"));
        assert_eq!(
            config.run.registry_path,
            PathBuf::from("data/destination_contacts.csv")
        );
    }

    #[test]
    fn test_run_section_overrides_defaults() {
        let toml_str = format!(
            "{MINIMAL}\n[run]\nroster_path = \"roster.csv\"\nrequest_delay_ms = 250\n"
        );
        let config: MigrationConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.run.roster_path, PathBuf::from("roster.csv"));
        assert_eq!(config.run.request_delay(), Duration::from_millis(250));
        // registry path stays at its default
        assert_eq!(
            config.run.registry_path,
            PathBuf::from("data/destination_contacts.csv")
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let config = MigrationConfig::load(file.path()).unwrap();
        assert_eq!(config.source.base_url, "https://source.example.com");
        assert_eq!(config.destination.fallback_agent_id, "agent-0");
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = MigrationConfig::load(Path::new("/nonexistent/chatlift.toml")).unwrap_err();
        assert!(matches!(err, ChatliftError::Config(_)));
    }
}
