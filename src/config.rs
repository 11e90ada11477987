use std::path::PathBuf;

use crate::core::error::{GraphError, Result};

/// Environment variable that overrides the default data directory
pub const DATA_DIR_ENV: &str = "PERSONA_GRAPH_DIR";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve the data directory (explicit path, then `PERSONA_GRAPH_DIR`,
    /// then the user config directory) and make sure it exists.
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir.or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from)) {
            Some(dir) => dir,
            None => dirs::config_dir()
                .ok_or_else(|| GraphError::Config("Could not find config directory".to_string()))?
                .join("persona-graph"),
        };

        std::fs::create_dir_all(&data_dir)?;

        Ok(Config { data_dir })
    }

    /// Storage location of the relationship graph
    pub fn graph_dir(&self) -> PathBuf {
        self.data_dir.join("relationships")
    }
}
