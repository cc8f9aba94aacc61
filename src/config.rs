use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::bible::ChapterReference;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub default_passage: Option<ChapterReference>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            default_passage: None,
            data_dir: None,
        }
    }

    /// The platform config file. Callers that should never touch the real
    /// config directory (tests) pass their own path instead.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("bible-reader").join("config.json"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
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

    /// Remember the last committed passage so the next session opens there.
    pub fn save_default_passage(path: &Path, passage: &ChapterReference) -> Result<()> {
        let mut config = Self::load_from(path).unwrap_or_else(|_| Self::new());
        config.default_passage = Some(passage.clone());
        config.save_to(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(book: &str, chapter: u32) -> ChapterReference {
        ChapterReference {
            version_id: "kjv".to_string(),
            book: book.to_string(),
            chapter,
        }
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.default_passage.is_none());
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_round_trip_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bible-reader").join("config.json");

        let mut config = Config::new();
        config.default_passage = Some(reference("exo", 5));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_passage.unwrap(), reference("exo", 5));
    }

    #[test]
    fn test_save_default_passage_keeps_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::new();
        config.data_dir = Some(PathBuf::from("/data/bibles"));
        config.save_to(&path).unwrap();

        Config::save_default_passage(&path, &reference("jhn", 3)).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_passage.unwrap(), reference("jhn", 3));
        assert_eq!(loaded.data_dir.unwrap(), PathBuf::from("/data/bibles"));
    }
}
