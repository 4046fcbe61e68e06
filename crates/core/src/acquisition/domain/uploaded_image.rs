use std::path::PathBuf;

use base64::Engine;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Please select a valid image file")]
    NotAnImage { mime_type: String },
    #[error("File size must be less than {}MB", .limit / (1024 * 1024))]
    TooLarge { size: u64, limit: u64 },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load image: {0}")]
    Decode(#[source] image::ImageError),
}

/// A user-selected file held in memory, before decoding.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadedImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// The file contents as a `data:` URL, used for the preview.
    pub fn data_url(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{b64}", self.mime_type)
    }

    /// Rejects non-image MIME types first, then files above `max_bytes`.
    pub fn validate(&self, max_bytes: u64) -> Result<(), UploadError> {
        if !self.mime_type.starts_with("image/") {
            return Err(UploadError::NotAnImage {
                mime_type: self.mime_type.clone(),
            });
        }
        if self.size() > max_bytes {
            return Err(UploadError::TooLarge {
                size: self.size(),
                limit: max_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LIMIT: u64 = 10 * 1024 * 1024;

    #[rstest]
    #[case::png("image/png")]
    #[case::jpeg("image/jpeg")]
    #[case::webp("image/webp")]
    fn test_accepts_image_types(#[case] mime: &str) {
        let upload = UploadedImage::new("photo", mime, vec![0; 16]);
        assert!(upload.validate(LIMIT).is_ok());
    }

    #[rstest]
    #[case::text("text/plain")]
    #[case::pdf("application/pdf")]
    #[case::unknown("application/octet-stream")]
    #[case::empty("")]
    fn test_rejects_non_image_types(#[case] mime: &str) {
        let upload = UploadedImage::new("doc", mime, vec![0; 16]);
        let err = upload.validate(LIMIT).unwrap_err();
        assert!(matches!(err, UploadError::NotAnImage { .. }));
        assert_eq!(err.to_string(), "Please select a valid image file");
    }

    #[test]
    fn test_rejects_oversized_file() {
        let upload = UploadedImage::new("big.png", "image/png", vec![0; (LIMIT + 1) as usize]);
        let err = upload.validate(LIMIT).unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { size, .. } if size == LIMIT + 1));
        assert_eq!(err.to_string(), "File size must be less than 10MB");
    }

    #[test]
    fn test_accepts_file_exactly_at_limit() {
        let upload = UploadedImage::new("edge.png", "image/png", vec![0; 1024]);
        assert!(upload.validate(1024).is_ok());
    }

    #[test]
    fn test_type_checked_before_size() {
        let upload = UploadedImage::new("big.txt", "text/plain", vec![0; 2048]);
        assert!(matches!(
            upload.validate(1024),
            Err(UploadError::NotAnImage { .. })
        ));
    }

    #[test]
    fn test_data_url_uses_mime_type() {
        let upload = UploadedImage::new("a.png", "image/png", vec![1, 2, 3]);
        assert_eq!(upload.data_url(), "data:image/png;base64,AQID");
    }
}
