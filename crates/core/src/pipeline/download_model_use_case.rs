use std::path::Path;

use crate::pipeline::status_reporter::{StatusKind, StatusReporter};
use crate::shared::constants::YUNET_MODEL_URL;
use crate::shared::model_resolver::{download_to, ProgressFn};

/// Fetches a model file straight to a user-chosen path, outside the
/// detection flow and its cache.
pub struct DownloadModelUseCase {
    url: String,
}

impl DownloadModelUseCase {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn execute(
        &self,
        dest: &Path,
        progress: Option<ProgressFn>,
        status: &mut dyn StatusReporter,
    ) -> Result<(), Box<dyn std::error::Error>> {
        status.report(StatusKind::Loading, "Downloading model manually...");
        match download_to(&self.url, dest, progress) {
            Ok(()) => {
                log::info!("Saved {} to {}", self.url, dest.display());
                status.report(StatusKind::Success, "Model downloaded successfully!");
                Ok(())
            }
            Err(e) => {
                status.report(StatusKind::Error, &format!("Manual download failed: {e}"));
                Err(e.into())
            }
        }
    }
}

impl Default for DownloadModelUseCase {
    fn default() -> Self {
        Self::new(YUNET_MODEL_URL)
    }
}
