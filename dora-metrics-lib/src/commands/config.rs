use crate::Result;
use crate::artifacts::DEFAULT_API_URL;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "dora.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root directory scanned for raw metric event files
    #[serde(default = "default_raw_dir")]
    pub raw_dir: Utf8PathBuf,

    /// Directory receiving the aggregated CSV tables
    #[serde(default = "default_export_dir")]
    pub export_dir: Utf8PathBuf,

    /// Directory receiving the run summary
    #[serde(default = "default_summary_dir")]
    pub summary_dir: Utf8PathBuf,

    /// Whether to export one row per lead time record
    #[serde(default = "default_true")]
    pub export_lead_time_raw: bool,

    /// Text that a workflow artifact's name must contain to be downloaded
    #[serde(default = "default_artifact_marker")]
    pub artifact_marker: String,

    /// Trailing window, in days, of artifacts to download
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,
}

fn default_raw_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("metrics/raw")
}

fn default_export_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("metrics/powerbi")
}

fn default_summary_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("metrics/aggregated")
}

const fn default_true() -> bool {
    true
}

fn default_artifact_marker() -> String {
    "dora-metrics".to_string()
}

const fn default_lookback_days() -> u32 {
    90
}

fn default_github_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `dora.toml` in `base_dir` is used when it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        if let Some(parent) = output_path.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent).into_app_err_with(|| format!("creating directory '{parent}'"))?;
        }

        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or the marker is empty, or the lookback window is zero
    pub fn validate(&self) -> Result<()> {
        for (name, dir) in [("raw_dir", &self.raw_dir), ("export_dir", &self.export_dir), ("summary_dir", &self.summary_dir)] {
            if dir.as_str().trim().is_empty() {
                return Err(app_err!("{name} must not be empty"));
            }
        }

        if self.artifact_marker.trim().is_empty() {
            return Err(app_err!("artifact_marker must not be empty"));
        }

        if self.lookback_days == 0 {
            return Err(app_err!("lookback_days must be at least 1, got {}", self.lookback_days));
        }

        if self.github_api_url.trim().is_empty() {
            return Err(app_err!("github_api_url must not be empty"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raw_dir: default_raw_dir(),
            export_dir: default_export_dir(),
            summary_dir: default_summary_dir(),
            export_lead_time_raw: default_true(),
            artifact_marker: default_artifact_marker(),
            lookback_days: default_lookback_days(),
            github_api_url: default_github_api_url(),
        }
    }
}
