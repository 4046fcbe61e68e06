use crate::acquisition::domain::image_decoder::ImageDecoder;
use crate::acquisition::domain::uploaded_image::{UploadError, UploadedImage};
use crate::shared::bitmap::Bitmap;

/// Decodes uploads with the pure-Rust `image` crate into RGBA bitmaps.
pub struct ImageCrateDecoder;

impl ImageCrateDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageCrateDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, upload: &UploadedImage) -> Result<Bitmap, UploadError> {
        let decoded = image::load_from_memory(&upload.bytes).map_err(UploadError::Decode)?;
        Ok(Bitmap::from(decoded.to_rgba8()))
    }
}
