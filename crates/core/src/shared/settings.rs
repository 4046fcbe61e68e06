use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{
    APP_DIR_NAME, BOX_LINE_WIDTH, DECODE_ENDPOINT_URL, DEFAULT_REQUEST_RETRIES,
    DEFAULT_REQUEST_TIMEOUT_SECS, LABEL_FONT_PX, MAX_UPLOAD_BYTES, RETINAFACE_MODEL_NAME,
    RETINAFACE_MODEL_URL,
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid settings in {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
    #[error("failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// User-tunable configuration, persisted as JSON.
///
/// Missing fields take their defaults, so older files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub decode_endpoint: String,
    pub model_name: String,
    pub model_url: String,
    /// Checked for a pre-installed model before downloading.
    pub models_dir: Option<PathBuf>,
    /// `None` disables the timeout entirely.
    pub request_timeout_secs: Option<u64>,
    pub request_retries: u32,
    pub max_upload_bytes: u64,
    pub font_path: Option<PathBuf>,
    pub box_line_width: u32,
    pub label_font_px: f32,
    pub keep_ratio: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            decode_endpoint: DECODE_ENDPOINT_URL.to_string(),
            model_name: RETINAFACE_MODEL_NAME.to_string(),
            model_url: RETINAFACE_MODEL_URL.to_string(),
            models_dir: None,
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
            request_retries: DEFAULT_REQUEST_RETRIES,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            font_path: None,
            box_line_width: BOX_LINE_WIDTH,
            label_font_px: LABEL_FONT_PX,
            keep_ratio: true,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("settings.json"))
    }

    /// Loads from the platform config path, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            log::warn!("{e}; using default settings");
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate().map_err(|reason| SettingsError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(settings)
    }

    /// A zero timeout would fail every request; `null` is the way to disable it.
    fn validate(&self) -> Result<(), String> {
        if self.request_timeout_secs == Some(0) {
            return Err(
                "request_timeout_secs must be at least 1 (use null to disable the timeout)"
                    .to_string(),
            );
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(write_err)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
