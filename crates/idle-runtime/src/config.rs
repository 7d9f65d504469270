//! Runtime configuration, read from YAML.

use anyhow::{Context, Result};
use persistence::{SaveFormat, DEFAULT_AUTOSAVE_INTERVAL_SECS, DEFAULT_CIPHER_KEY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ticker::DEFAULT_TICK_RATE;

/// Everything needed to boot a [`crate::Session`]. Missing keys take defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub skins_root: PathBuf,
    pub skin: String,
    /// `None` uses the platform data directory.
    pub save_dir: Option<PathBuf>,
    pub tick_rate: f64,
    pub autosave_interval_secs: f64,
    pub cipher_key: String,
    pub save_format: SaveFormat,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            skins_root: PathBuf::from("assets/skins"),
            skin: "Classic".to_string(),
            save_dir: None,
            tick_rate: DEFAULT_TICK_RATE,
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL_SECS,
            cipher_key: DEFAULT_CIPHER_KEY.to_string(),
            save_format: SaveFormat::Json,
        }
    }
}

impl RuntimeConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("Invalid runtime config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("In {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(RuntimeConfig::from_yaml("{}").unwrap(), RuntimeConfig::default());
    }

    #[test]
    fn partial_yaml_overrides() {
        let cfg = RuntimeConfig::from_yaml(
            "skin: Neon\ntick_rate: 30\nsave_format: bincode\nsave_dir: /tmp/idle\n",
        )
        .unwrap();
        assert_eq!(cfg.skin, "Neon");
        assert_eq!(cfg.tick_rate, 30.0);
        assert_eq!(cfg.save_format, SaveFormat::Bincode);
        assert_eq!(cfg.save_dir, Some(PathBuf::from("/tmp/idle")));
        assert_eq!(cfg.cipher_key, DEFAULT_CIPHER_KEY);
    }

    #[test]
    fn load_reports_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = RuntimeConfig::load(&tmp.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("nope.yaml"));
    }

    #[test]
    fn bad_yaml_is_an_error() {
        assert!(RuntimeConfig::from_yaml("tick_rate: [fast]").is_err());
    }
}
