//! CLI configuration.

use anyhow::{Context, Result};
use nearby_commerce::SimulationConfig;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["nearby.toml", ".nearby.toml", "nearby.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Store reply and location simulation.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(path, &content)
    }

    /// Parse config text, as JSON when `path` ends in `.json` and TOML otherwise.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content).with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Where the catalog comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog document. The built-in reference catalog is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Generate a default nearby.toml config file.
pub fn generate_default_config() -> String {
    let defaults = SimulationConfig::default();
    format!(
        r#"# Nearby shopping configuration

[simulation]
# Milliseconds before store replies arrive
reply_delay_ms = {reply}
# Milliseconds before "use my location" resolves
locate_delay_ms = {locate}
# A store has the product when its draw is above this value
availability_cutoff = {cutoff:?}
# Stores offered for messaging
nearby_limit = {limit}
# Fix the seed for reproducible replies
# seed = 42

[catalog]
# JSON document with "products" and "stores"; the reference catalog is used when unset
# path = "catalog.json"
"#,
        reply = defaults.reply_delay_ms,
        locate = defaults.locate_delay_ms,
        cutoff = defaults.availability_cutoff,
        limit = defaults.nearby_limit,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let config = CliConfig::parse("nearby.toml", &generate_default_config()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CliConfig::parse(
            "nearby.toml",
            "[simulation]\nreply_delay_ms = 10\nseed = 7\n\n[catalog]\npath = \"data.json\"\n",
        )
        .unwrap();
        assert_eq!(config.simulation.reply_delay_ms, 10);
        assert_eq!(config.simulation.locate_delay_ms, 1500);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.catalog.path.as_deref(), Some("data.json"));
    }

    #[test]
    fn test_json_config() {
        let config =
            CliConfig::parse("nearby.json", r#"{"simulation":{"nearby_limit":2}}"#).unwrap();
        assert_eq!(config.simulation.nearby_limit, 2);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_bad_config_names_file() {
        let err = CliConfig::parse("broken.toml", "[simulation\n").unwrap_err();
        assert!(format!("{:#}", err).contains("broken.toml"));
    }
}
