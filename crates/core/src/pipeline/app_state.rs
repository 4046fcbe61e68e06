use crate::rendering::result_renderer::RenderedResult;
use crate::shared::bitmap::Bitmap;

/// An accepted upload, decoded and ready for detection.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedImage {
    pub file_name: String,
    /// `data:` URL of the file as uploaded.
    pub preview_url: String,
    pub bitmap: Bitmap,
}

/// Where the application is between user actions.
///
/// Every state past `Empty` keeps the uploaded image, so a failed or
/// finished detection can be run again without re-uploading.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AppState {
    #[default]
    Empty,
    Uploaded {
        image: LoadedImage,
    },
    Detecting {
        image: LoadedImage,
    },
    Rendered {
        image: LoadedImage,
        result: RenderedResult,
    },
    Failed {
        image: LoadedImage,
        message: String,
    },
}

impl AppState {
    pub fn image(&self) -> Option<&LoadedImage> {
        match self {
            AppState::Empty => None,
            AppState::Uploaded { image }
            | AppState::Detecting { image }
            | AppState::Rendered { image, .. }
            | AppState::Failed { image, .. } => Some(image),
        }
    }

    pub fn result(&self) -> Option<&RenderedResult> {
        match self {
            AppState::Rendered { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn is_detecting(&self) -> bool {
        matches!(self, AppState::Detecting { .. })
    }

    pub fn can_detect(&self) -> bool {
        self.image().is_some() && !self.is_detecting()
    }

    /// Accepted upload: replaces any previous image and hides old results.
    pub fn upload(&mut self, image: LoadedImage) {
        *self = AppState::Uploaded { image };
    }

    /// Enters `Detecting` and hands back the image to run on.
    ///
    /// Returns `None` and leaves the state alone when detection is not
    /// currently possible.
    pub fn begin_detection(&mut self) -> Option<&LoadedImage> {
        if !self.can_detect() {
            return None;
        }
        let image = self.take_image()?;
        *self = AppState::Detecting { image };
        self.image()
    }

    /// Leaves `Detecting` with the outcome of the run. No-op in any other state.
    pub fn finish_detection(&mut self, outcome: Result<RenderedResult, String>) {
        if !self.is_detecting() {
            return;
        }
        let Some(image) = self.take_image() else {
            return;
        };
        *self = match outcome {
            Ok(result) => AppState::Rendered { image, result },
            Err(message) => AppState::Failed { image, message },
        };
    }

    pub fn reset(&mut self) {
        *self = AppState::Empty;
    }

    fn take_image(&mut self) -> Option<LoadedImage> {
        match std::mem::take(self) {
            AppState::Empty => None,
            AppState::Uploaded { image }
            | AppState::Detecting { image }
            | AppState::Rendered { image, .. }
            | AppState::Failed { image, .. } => Some(image),
        }
    }
}
