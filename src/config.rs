use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming an optional JSON file that overrides defaults.
pub const CONFIG_ENV: &str = "RUSTY_EDA_CONFIG";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Widget bounds and defaults. Every field falls back to its default when
/// missing from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Column coerced to a timestamp and used to order rows.
    pub date_column: String,
    /// How many numeric columns the heatmap selects initially.
    pub heatmap_default_columns: usize,
    pub sample_min: usize,
    pub sample_max: usize,
    pub sample_default: usize,
    pub sample_step: usize,
    /// Seed of the scatter sampler; fixed so reruns are reproducible.
    pub sample_seed: u64,
    pub bins_min: usize,
    pub bins_max: usize,
    pub bins_default: usize,
    pub bins_step: usize,
    /// Rows shown in the sidebar preview table.
    pub preview_rows: usize,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            date_column: "day".to_string(),
            heatmap_default_columns: 6,
            sample_min: 500,
            sample_max: 10_000,
            sample_default: 3_000,
            sample_step: 500,
            sample_seed: 42,
            bins_min: 10,
            bins_max: 120,
            bins_default: 30,
            bins_step: 5,
            preview_rows: 50,
            window_size: [1280.0, 860.0],
        }
    }
}

impl DashboardConfig {
    /// Read a config file (JSON).
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text).context("parsing config JSON")
    }

    /// Defaults, overridden by the file named in [`CONFIG_ENV`] if set.
    /// A broken config file is logged and ignored.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::from_path(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring configuration: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "sample_seed": 7, "bins_default": 40 }}"#).unwrap();

        let config = DashboardConfig::from_path(file.path()).unwrap();
        assert_eq!(config.sample_seed, 7);
        assert_eq!(config.bins_default, 40);
        assert_eq!(config.date_column, "day");
        assert_eq!(config.sample_max, 10_000);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(DashboardConfig::from_path(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(DashboardConfig::from_path(Path::new("/nonexistent/eda.json")).is_err());
    }
}
