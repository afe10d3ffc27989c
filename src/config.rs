use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Report title when `--name` is not given
    pub title: String,
    /// Output path when `--output` is not given
    pub output: PathBuf,
    /// Number of intervals each device chart axis is split into
    pub axis_splits: u32,
    /// Where the report page loads ECharts from
    pub echarts_url: String,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title:       "Iostat Report".into(),
            output:      PathBuf::from("iostat.html"),
            axis_splits: 5,
            echarts_url: "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js".into(),
        }
    }
}

// ── Load ──────────────────────────────────────────────────────────────

impl Config {
    /// Load the user config; a missing file means defaults, a broken one is
    /// reported and ignored.
    pub fn load() -> Self {
        let Some(path) = Config::config_path() else {
            return Config::default();
        };
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Config::default();
        }
        match Config::from_file(&path) {
            Ok(c)  => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Config::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(text)?;
        Ok(cfg)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("iostat-report").join("config.toml"))
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_report_table() {
        let cfg = Config::from_toml("[report]\ntitle = \"db01 disks\"\naxis_splits = 4\n").unwrap();
        assert_eq!(cfg.report.title, "db01 disks");
        assert_eq!(cfg.report.axis_splits, 4);
        assert_eq!(cfg.report.output, PathBuf::from("iostat.html"));
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(Config::from_toml("[report]\naxis_splits = \"five\"\n").is_err());
    }

    #[test]
    fn toml_round_trip() {
        let cfg = Config::default();
        let text = cfg.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[report]\noutput = \"out/disk.html\"\n").unwrap();
        let cfg = Config::from_file(&path).unwrap();
        assert_eq!(cfg.report.output, PathBuf::from("out/disk.html"));
    }
}
