use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub default_translation: Option<String>,
    pub api_base: Option<String>,
    pub dictionary_api_base: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            default_translation: None,
            api_base: None,
            dictionary_api_base: None,
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Missing file means first run: start from defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Remember the last chosen translation across sessions.
    pub fn save_default_translation(translation: &str) -> Result<()> {
        Self::save_default_translation_at(&Self::get_config_path()?, translation)
    }

    fn save_default_translation_at(path: &Path, translation: &str) -> Result<()> {
        let mut config = Self::load_from(path).unwrap_or_else(|_| Self::new());
        config.default_translation = Some(translation.to_string());
        config.save_to(path)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("verselens").join("config.json"))
    }
}
