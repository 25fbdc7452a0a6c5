use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_keyword")]
    pub keyword: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,
    /// 0 prints the whole feed.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    #[serde(default = "default_show_attachments")]
    pub show_attachments: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keyword: default_keyword(),
            log_level: default_log_level(),
            channel_capacity: default_channel_capacity(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            wrap_width: default_wrap_width(),
            max_items: default_max_items(),
            show_attachments: default_show_attachments(),
        }
    }
}

fn default_keyword() -> String {
    "anime".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_channel_capacity() -> usize {
    256
}
fn default_wrap_width() -> usize {
    80
}
fn default_max_items() -> usize {
    50
}
fn default_show_attachments() -> bool {
    true
}

impl Config {
    /// Load from an explicit path, or from the user config dir when it has a
    /// config file. Falls back to defaults only when no path was given.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Config::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Config> {
        Ok(toml::from_str(content)?)
    }

    fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            bail!("channel_capacity must be greater than 0");
        }
        Ok(())
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tweetstream").join("config.toml"))
}
