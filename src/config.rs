//! Runtime configuration, read from an optional TOML file

use crate::error::{FaceFinderError, Result};
use crate::finder::{FACES_LIMIT, SIMILAR_LIMIT};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file holding the faces table
    pub database: PathBuf,
    pub faces_limit: usize,
    pub similar_limit: usize,
    /// Address the REST server binds to
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: PathBuf::from("facefinder.db"),
            faces_limit: FACES_LIMIT,
            similar_limit: SIMILAR_LIMIT,
            bind: "0.0.0.0:7878".to_string(),
        }
    }
}

impl Config {
    /// Reads a config file. Keys left out keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        Config::from_toml(&text)
            .map_err(|e| FaceFinderError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(text: &str) -> Result<Config> {
        toml::from_str(text).map_err(|e| FaceFinderError::Config(e.to_string()))
    }
}
