use crate::error::{EanMatchError, Result};
use ean_match_common::MatchOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_COLUMN: &str = "EAN";
pub const DEFAULT_OUTPUT_NAME: &str = "resultats_correspondance.zip";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// EAN列の既定の見出し
    #[serde(default = "default_column")]
    pub ean_column: String,
    /// 既定の照合パターン
    #[serde(default)]
    pub match_options: MatchOptions,
    /// 出力ZIPの既定ファイル名
    #[serde(default = "default_output_name")]
    pub output_name: String,
}

fn default_column() -> String {
    DEFAULT_COLUMN.into()
}

fn default_output_name() -> String {
    DEFAULT_OUTPUT_NAME.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ean_column: default_column(),
            match_options: MatchOptions::default(),
            output_name: default_output_name(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            log::debug!("設定を読み込み: {}", config_path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| EanMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ean-match").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.ean_column, "EAN");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.ean_column = "Code EAN".into();
        config.match_options.bare_jpg = true;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"output_name": "out.zip"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.output_name, "out.zip");
        assert_eq!(config.ean_column, "EAN");
        assert_eq!(config.match_options, MatchOptions::default());
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();

        assert!(matches!(Config::load_from(&path), Err(EanMatchError::JsonParse(_))));
    }
}
