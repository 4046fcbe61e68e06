use crate::acquisition::domain::uploaded_image::{UploadError, UploadedImage};
use crate::shared::bitmap::Bitmap;

/// Turns an uploaded file into pixels.
pub trait ImageDecoder: Send {
    fn decode(&self, upload: &UploadedImage) -> Result<Bitmap, UploadError>;
}
