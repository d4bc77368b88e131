use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize defaults: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSysConfig {
    pub load_distance: u32,
    pub unload_distance: u32,
    pub block_dir: PathBuf,
    pub generation_threads: usize,
}

impl Default for ChunkSysConfig {
    fn default() -> Self {
        Self {
            load_distance: 8,
            unload_distance: 12,
            block_dir: PathBuf::from("assets/blocks"),
            generation_threads: 4,
        }
    }
}

impl ChunkSysConfig {
    /// Reads the config from `path`, writing out the defaults first if no
    /// file exists yet.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if !path.exists() {
            let defaults = Self::default();
            std::fs::write(path, toml::to_string_pretty(&defaults)?)?;
            return Ok(defaults);
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunksys.toml");

        let config = ChunkSysConfig::load_or_create(&path).unwrap();
        assert_eq!(config.load_distance, 8);
        assert!(path.exists());
    }

    #[test]
    fn existing_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunksys.toml");
        std::fs::write(
            &path,
            "load_distance = 3\nunload_distance = 5\nblock_dir = \"data/blocks\"\ngeneration_threads = 2\n",
        )
        .unwrap();

        let config = ChunkSysConfig::load_or_create(&path).unwrap();
        assert_eq!(config.load_distance, 3);
        assert_eq!(config.unload_distance, 5);
        assert_eq!(config.block_dir, PathBuf::from("data/blocks"));
    }

    #[test]
    fn malformed_file_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunksys.toml");
        std::fs::write(&path, "load_distance = \"many\"").unwrap();

        let err = ChunkSysConfig::load_or_create(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
