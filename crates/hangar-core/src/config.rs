use serde::{Deserialize, Serialize};
use std::path::Path;

pub const AIRPORTS_CSV_URL: &str =
    "https://raw.githubusercontent.com/davidmegginson/ourairports-data/main/airports.csv";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(std::io::Error),
    #[error("failed to write config file: {0}")]
    Write(std::io::Error),
    #[error("failed to parse toml: {0}")]
    Parse(toml::de::Error),
    #[error("failed to serialize toml: {0}")]
    Serialize(toml::ser::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub community: CommunitySection,
    #[serde(default)]
    pub airports: AirportsSection,
}

impl Config {
    pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        let config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content).map_err(ConfigError::Write)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CommunitySection {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AirportsSection {
    pub dataset_url: String,
}

impl Default for AirportsSection {
    fn default() -> Self {
        AirportsSection {
            dataset_url: AIRPORTS_CSV_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{Config, AIRPORTS_CSV_URL};

    #[test]
    fn config_round_trip() {
        let mut config = Config::default();
        config.community.path = Some("/sim/Community".to_string());

        let toml = toml::to_string(&config).expect("serialize failed");
        let decoded: Config = toml::from_str(&toml).expect("deserialize failed");
        assert_eq!(config, decoded);
    }

    #[test]
    fn default_config_has_dataset_url_and_no_community_path() {
        let config = Config::default();
        assert_eq!(config.airports.dataset_url, AIRPORTS_CSV_URL);
        assert!(config.community.path.is_none());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let decoded: Config =
            toml::from_str("[community]\npath = \"/sim\"\n").expect("deserialize failed");
        assert_eq!(decoded.community.path.as_deref(), Some("/sim"));
        assert_eq!(decoded.airports.dataset_url, AIRPORTS_CSV_URL);
    }
}
