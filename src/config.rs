use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// `<home>/data/cameraTestReport.json`
    #[default]
    File,
    /// `<home>/shutterlog.db`
    Sqlite,
}

/// App config stored in `<home>/config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub storage: StorageBackend,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Where exported reports go; `<home>/exports` when unset.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            log_filter: default_log_filter(),
            export_dir: None,
        }
    }
}

impl Config {
    pub fn export_dir(&self, home: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| home.join("exports"))
    }
}

/// Default application home: the platform data dir plus `shutterlog`.
pub fn shutterlog_home() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("shutterlog"))
}

pub fn read_config(home: &Path) -> Result<Config> {
    let path = home.join("config.json");
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
        tracing::warn!("config.json is malformed, using defaults: {}", e);
        Config::default()
    }))
}

pub fn write_config(home: &Path, config: &Config) -> Result<()> {
    std::fs::create_dir_all(home)?;
    let tmp = home.join("config.json.tmp");
    std::fs::write(&tmp, serde_json::to_string_pretty(config)?)?;
    std::fs::rename(&tmp, home.join("config.json"))?;
    Ok(())
}
