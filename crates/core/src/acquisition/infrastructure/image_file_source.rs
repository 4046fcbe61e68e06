use std::fs;
use std::path::Path;

use crate::acquisition::domain::uploaded_image::{UploadError, UploadedImage};

const UNKNOWN_MIME: &str = "application/octet-stream";

/// Reads a file from disk into an [`UploadedImage`].
///
/// The MIME type follows the file extension, the way a browser file picker
/// reports it; files without an extension are sniffed from their header.
/// No validation happens here.
pub fn read_upload(path: &Path) -> Result<UploadedImage, UploadError> {
    let bytes = fs::read(path).map_err(|source| UploadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mime_type = mime_type_for(path, &bytes);
    log::debug!("Read {file_name} ({} bytes, {mime_type})", bytes.len());

    Ok(UploadedImage::new(file_name, mime_type, bytes))
}

fn mime_type_for(path: &Path, bytes: &[u8]) -> &'static str {
    match path.extension() {
        Some(_) => image::ImageFormat::from_path(path)
            .map(|f| f.to_mime_type())
            .unwrap_or(UNKNOWN_MIME),
        None => image::guess_format(bytes)
            .map(|f| f.to_mime_type())
            .unwrap_or(UNKNOWN_MIME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let img = image::RgbImage::from_pixel(4, 3, image::Rgb([1, 2, 3]));
        img.save_with_format(&path, image::ImageFormat::Png).unwrap();
        path
    }

    #[test]
    fn test_reads_bytes_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "face.png");

        let upload = read_upload(&path).unwrap();

        assert_eq!(upload.file_name, "face.png");
        assert_eq!(upload.mime_type, "image/png");
        assert_eq!(upload.bytes, fs::read(&path).unwrap());
    }

    #[test]
    fn test_jpeg_extension_maps_to_jpeg_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.JPG");
        fs::write(&path, b"not really a jpeg").unwrap();

        assert_eq!(read_upload(&path).unwrap().mime_type, "image/jpeg");
    }

    #[test]
    fn test_text_file_is_not_an_image_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"hello").unwrap();

        let upload = read_upload(&path).unwrap();

        assert!(!upload.mime_type.starts_with("image/"));
    }

    #[test]
    fn test_extensionless_file_is_sniffed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "snapshot");

        assert_eq!(read_upload(&path).unwrap().mime_type, "image/png");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = read_upload(Path::new("/nonexistent/face.png"));
        assert!(matches!(result, Err(UploadError::Read { .. })));
    }
}
