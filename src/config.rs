use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::net::io::Format;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Fire transitions that need no output choice as soon as they are selected.
    #[serde(default = "default_auto_fire")]
    pub auto_fire: bool,
    /// Upper bound on scripted firing steps in one run.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default = "default_output_format")]
    pub output_format: Format,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            auto_fire: default_auto_fire(),
            max_steps: default_max_steps(),
            output_format: default_output_format(),
        }
    }
}

impl GameConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("config {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: GameConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }
}

fn default_auto_fire() -> bool {
    true
}

fn default_max_steps() -> usize {
    1000
}

fn default_output_format() -> Format {
    Format::Json
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load_from_file(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.toml");
        fs::write(&path, "auto_fire = false\noutput_format = \"ron\"\n").unwrap();
        let config = GameConfig::load_from_file(&path).unwrap();
        assert!(!config.auto_fire);
        assert_eq!(config.output_format, Format::Ron);
        assert_eq!(config.max_steps, 1000);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.toml");
        fs::write(&path, "auto_fire = \"maybe\"").unwrap();
        let err = GameConfig::load_from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }
}
