use blackjack::{Decision, TableConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub table: TableConfig,
    pub autoplay: ConfigAutoplay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigAutoplay {
    pub rounds: u32,
    pub bet: u32,
    /// Play this decision whenever it is legal instead of following the advisor.
    pub fixed_decision: Option<String>,
    /// Re-deal with the previous bet instead of placing chips each round.
    pub rebet: bool,
}

impl Default for ConfigAutoplay {
    fn default() -> Self {
        ConfigAutoplay {
            rounds: 100,
            bet: 50,
            fixed_decision: None,
            rebet: true,
        }
    }
}

impl ConfigAutoplay {
    pub fn fixed_decision(&self) -> Result<Option<Decision>, serde::de::value::Error> {
        self.fixed_decision
            .as_deref()
            .map(str::parse::<Decision>)
            .transpose()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Cannot parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid fixed decision: {0}")]
    Decision(#[from] serde::de::value::Error),
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &str) -> Result<Config, ConfigError> {
    let file_content = fs::read_to_string(filename).map_err(|source| ConfigError::Read {
        path: String::from(filename),
        source,
    })?;
    parse_config(&file_content)
}

pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_yaml::from_str(content)?;
    config.autoplay.fixed_decision()?;
    Ok(config)
}
