use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::level::LevelSettings;

/// What to do with an object whose corners do not form a box.
#[derive(Deserialize, clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockErrorPolicy {
    /// Fail the whole document.
    Abort,
    /// Leave the object out and keep converting.
    Skip,
}

impl Default for BlockErrorPolicy {
    fn default() -> Self {
        BlockErrorPolicy::Abort
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub block_errors: BlockErrorPolicy,
    pub output_extension: String,
    pub level_settings: LevelSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_errors: BlockErrorPolicy::default(),
            output_extension: "txt".to_string(),
            level_settings: LevelSettings::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
