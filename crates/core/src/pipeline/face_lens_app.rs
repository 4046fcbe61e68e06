use std::path::Path;

use thiserror::Error;

use crate::acquisition::domain::image_decoder::ImageDecoder;
use crate::acquisition::domain::uploaded_image::{UploadError, UploadedImage};
use crate::acquisition::infrastructure::image_crate_decoder::ImageCrateDecoder;
use crate::acquisition::infrastructure::image_file_source::read_upload;
use crate::decoding::infrastructure::http_box_decoder::HttpBoxDecoder;
use crate::inference::infrastructure::lazy_network::LazyNetwork;
use crate::inference::infrastructure::onnx_retinaface_network::retinaface_loader;
use crate::pipeline::app_state::{AppState, LoadedImage};
use crate::pipeline::detect_faces_use_case::DetectFacesUseCase;
use crate::pipeline::status_reporter::{StatusBoard, StatusKind, StatusMessage, StatusReporter};
use crate::preprocessing::PreprocessOptions;
use crate::rendering::infrastructure::image_canvas::{CanvasStyle, ImageCanvasFactory};
use crate::rendering::result_renderer::RenderedResult;
use crate::shared::constants::BOX_COLOR;
use crate::shared::settings::Settings;

const UPLOADED_MESSAGE: &str = "Image uploaded successfully. Click \"Detect Faces\" to proceed.";
const DETECTED_MESSAGE: &str = "Face detection completed successfully!";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Please upload an image first")]
    NoImage,
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("Face detection failed: {0}")]
    Detection(String),
}

/// The face detection application: one uploaded image at a time, a cached
/// network, and the status line shown to the user.
///
/// Every failure is turned into an error status; the state only moves on
/// accepted uploads, detection runs and resets.
pub struct FaceLensApp {
    state: AppState,
    use_case: DetectFacesUseCase,
    decoder: Box<dyn ImageDecoder>,
    status: StatusBoard,
    max_upload_bytes: u64,
}

impl FaceLensApp {
    pub fn new(
        use_case: DetectFacesUseCase,
        decoder: Box<dyn ImageDecoder>,
        reporter: Box<dyn StatusReporter>,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            state: AppState::Empty,
            use_case,
            decoder,
            status: StatusBoard::new(reporter),
            max_upload_bytes,
        }
    }

    /// Wires the production stack: ONNX Runtime network, HTTP decoder and
    /// raster canvas, all configured from `settings`.
    pub fn from_settings(
        settings: &Settings,
        reporter: Box<dyn StatusReporter>,
        download_progress: fn(u64, u64),
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let network = LazyNetwork::new(retinaface_loader(
            settings.model_name.clone(),
            settings.model_url.clone(),
            settings.models_dir.clone(),
            download_progress,
        ));
        let decoder = HttpBoxDecoder::new(
            settings.decode_endpoint.clone(),
            settings.request_timeout(),
            settings.request_retries,
        )?;

        let style = CanvasStyle {
            line_width: settings.box_line_width,
            font_px: settings.label_font_px,
            color: BOX_COLOR,
        };
        let mut canvas_factory = ImageCanvasFactory::new(style)?;
        if let Some(path) = &settings.font_path {
            canvas_factory = canvas_factory.with_font_file(path)?;
        }

        let options = PreprocessOptions {
            keep_ratio: settings.keep_ratio,
            ..PreprocessOptions::default()
        };
        let use_case = DetectFacesUseCase::new(
            network,
            Box::new(decoder),
            Box::new(canvas_factory),
            options,
        );

        Ok(Self::new(
            use_case,
            Box::new(ImageCrateDecoder::new()),
            reporter,
            settings.max_upload_bytes,
        ))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn can_detect(&self) -> bool {
        self.state.can_detect()
    }

    pub fn result(&self) -> Option<&RenderedResult> {
        self.state.result()
    }

    pub fn last_status(&self) -> Option<&StatusMessage> {
        self.status.last()
    }

    pub fn upload_file(&mut self, path: &Path) -> Result<(), AppError> {
        match read_upload(path) {
            Ok(upload) => self.upload(upload),
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Validates and decodes `upload`. On rejection the current image, if
    /// any, stays in place.
    pub fn upload(&mut self, upload: UploadedImage) -> Result<(), AppError> {
        if let Err(e) = upload.validate(self.max_upload_bytes) {
            return Err(self.reject(e));
        }
        let bitmap = match self.decoder.decode(&upload) {
            Ok(bitmap) => bitmap,
            Err(e) => return Err(self.reject(e)),
        };

        log::info!(
            "Uploaded {} ({}x{}, {} bytes)",
            upload.file_name,
            bitmap.width(),
            bitmap.height(),
            upload.size()
        );
        self.state.upload(LoadedImage {
            preview_url: upload.data_url(),
            file_name: upload.file_name,
            bitmap,
        });
        self.status.report(StatusKind::Success, UPLOADED_MESSAGE);
        Ok(())
    }

    /// Runs detection on the current image.
    pub fn detect(&mut self) -> Result<(), AppError> {
        let Some(image) = self.state.begin_detection() else {
            let err = AppError::NoImage;
            self.status.report(StatusKind::Error, &err.to_string());
            return Err(err);
        };

        let outcome = self
            .use_case
            .execute(&image.bitmap, &mut self.status)
            .map_err(|e| e.to_string());

        match outcome {
            Ok(result) => {
                self.state.finish_detection(Ok(result));
                self.status.report(StatusKind::Success, DETECTED_MESSAGE);
                Ok(())
            }
            Err(message) => {
                log::error!("Face detection failed: {message}");
                self.state.finish_detection(Err(message.clone()));
                let err = AppError::Detection(message);
                self.status.report(StatusKind::Error, &err.to_string());
                Err(err)
            }
        }
    }

    /// Drops the image and any results. The loaded network is kept.
    pub fn reset(&mut self) {
        self.state.reset();
        self.status.clear();
    }

    fn reject(&mut self, e: UploadError) -> AppError {
        self.status.report(StatusKind::Error, &e.to_string());
        AppError::Upload(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoding::domain::box_decoder::{BoxDecoder, DecodeError};
    use crate::decoding::domain::decode_request::DecodeRequest;
    use crate::inference::domain::face_network::{
        FaceNetwork, InferenceError, RawOutputs, RawTensor,
    };
    use crate::pipeline::status_reporter::NullStatusReporter;
    use crate::preprocessing::normalize::PreprocessedTensor;
    use crate::shared::detection_box::DetectionBox;
    use std::io::Cursor;

    const LIMIT: u64 = 10 * 1024 * 1024;

    struct StubNetwork;

    impl FaceNetwork for StubNetwork {
        fn run(&mut self, _input: PreprocessedTensor) -> Result<RawOutputs, InferenceError> {
            let empty = RawTensor {
                dims: vec![1, 0, 4],
                data: vec![],
            };
            Ok(RawOutputs {
                loc: empty.clone(),
                conf: empty,
            })
        }
    }

    struct StubDecoder {
        boxes: Option<Vec<DetectionBox>>,
    }

    impl BoxDecoder for StubDecoder {
        fn decode(&self, _request: &DecodeRequest) -> Result<Vec<DetectionBox>, DecodeError> {
            self.boxes.clone().ok_or(DecodeError::Status { status: 503 })
        }
    }

    fn app(boxes: Option<Vec<DetectionBox>>) -> FaceLensApp {
        let network = LazyNetwork::new(Box::new(|| Ok(Box::new(StubNetwork) as Box<dyn FaceNetwork>)));
        let use_case = DetectFacesUseCase::new(
            network,
            Box::new(StubDecoder { boxes }),
            Box::new(ImageCanvasFactory::new(CanvasStyle::default()).unwrap()),
            PreprocessOptions::default(),
        );
        FaceLensApp::new(
            use_case,
            Box::new(ImageCrateDecoder::new()),
            Box::new(NullStatusReporter),
            LIMIT,
        )
    }

    fn png_upload(name: &str, w: u32, h: u32) -> UploadedImage {
        let mut bytes = Vec::new();
        image::RgbaImage::from_pixel(w, h, image::Rgba([200, 180, 160, 255]))
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        UploadedImage::new(name, "image/png", bytes)
    }

    fn last_status(app: &FaceLensApp) -> (StatusKind, String) {
        let s = app.last_status().unwrap();
        (s.kind, s.text.clone())
    }

    #[test]
    fn test_starts_empty() {
        let app = app(Some(vec![]));
        assert_eq!(app.state(), &AppState::Empty);
        assert!(!app.can_detect());
        assert!(app.last_status().is_none());
    }

    #[test]
    fn test_upload_enables_detect() {
        let mut app = app(Some(vec![]));

        app.upload(png_upload("face.png", 32, 24)).unwrap();

        assert!(app.can_detect());
        let image = app.state().image().unwrap();
        assert_eq!(image.file_name, "face.png");
        assert_eq!((image.bitmap.width(), image.bitmap.height()), (32, 24));
        assert!(image.preview_url.starts_with("data:image/png;base64,"));
        assert_eq!(last_status(&app), (StatusKind::Success, UPLOADED_MESSAGE.to_string()));
    }

    #[test]
    fn test_non_image_rejected_and_detect_stays_disabled() {
        let mut app = app(Some(vec![]));

        let err = app
            .upload(UploadedImage::new("notes.txt", "text/plain", b"hello".to_vec()))
            .unwrap_err();

        assert!(matches!(err, AppError::Upload(UploadError::NotAnImage { .. })));
        assert!(!app.can_detect());
        assert_eq!(
            last_status(&app),
            (StatusKind::Error, "Please select a valid image file".to_string())
        );
    }

    #[test]
    fn test_rejected_upload_keeps_previous_image() {
        let mut app = app(Some(vec![]));
        app.upload(png_upload("first.png", 16, 16)).unwrap();

        assert!(app
            .upload(UploadedImage::new("notes.txt", "text/plain", b"hello".to_vec()))
            .is_err());

        assert!(app.can_detect());
        assert_eq!(app.state().image().unwrap().file_name, "first.png");
    }

    #[test]
    fn test_oversized_upload_rejected() {
        let mut app = app(Some(vec![]));
        let big = UploadedImage::new("big.png", "image/png", vec![0; LIMIT as usize + 1]);

        let err = app.upload(big).unwrap_err();

        assert!(matches!(err, AppError::Upload(UploadError::TooLarge { .. })));
        assert!(!app.can_detect());
    }

    #[test]
    fn test_undecodable_upload_rejected() {
        let mut app = app(Some(vec![]));

        let err = app
            .upload(UploadedImage::new("broken.png", "image/png", vec![1, 2, 3, 4]))
            .unwrap_err();

        assert!(matches!(err, AppError::Upload(UploadError::Decode(_))));
        assert_eq!(app.state(), &AppState::Empty);
    }

    #[test]
    fn test_detect_without_image() {
        let mut app = app(Some(vec![]));

        let err = app.detect().unwrap_err();

        assert!(matches!(err, AppError::NoImage));
        assert_eq!(
            last_status(&app),
            (StatusKind::Error, "Please upload an image first".to_string())
        );
        assert_eq!(app.state(), &AppState::Empty);
    }

    #[test]
    fn test_detect_renders_result() {
        let face = DetectionBox::new([4.0, 4.0, 20.0, 20.0], 0.9);
        let mut app = app(Some(vec![face]));
        app.upload(png_upload("face.png", 32, 32)).unwrap();

        app.detect().unwrap();

        let result = app.result().unwrap();
        assert_eq!(result.boxes, vec![face]);
        assert_eq!(
            result.summary.report_lines(),
            vec!["Faces Detected: 1", "Average Confidence: 90.0%"]
        );
        assert!(result.data_url().starts_with("data:image/png;base64,"));
        assert!(matches!(app.state(), AppState::Rendered { .. }));
        assert_eq!(last_status(&app), (StatusKind::Success, DETECTED_MESSAGE.to_string()));
    }

    #[test]
    fn test_failed_detection_keeps_image_for_retry() {
        let mut app = app(None);
        app.upload(png_upload("face.png", 32, 32)).unwrap();

        let err = app.detect().unwrap_err();

        assert!(matches!(err, AppError::Detection(_)));
        assert!(matches!(app.state(), AppState::Failed { .. }));
        assert!(app.result().is_none());
        assert!(app.can_detect());
        let (kind, text) = last_status(&app);
        assert_eq!(kind, StatusKind::Error);
        assert!(text.starts_with("Face detection failed: Post-processing failed"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut app = app(Some(vec![]));
        app.upload(png_upload("face.png", 8, 8)).unwrap();
        app.detect().unwrap();

        app.reset();

        assert_eq!(app.state(), &AppState::Empty);
        assert!(!app.can_detect());
        assert!(app.last_status().is_none());
    }

    #[test]
    fn test_upload_file_missing_path() {
        let mut app = app(Some(vec![]));

        let err = app
            .upload_file(Path::new("/nonexistent/face.png"))
            .unwrap_err();

        assert!(matches!(err, AppError::Upload(UploadError::Read { .. })));
        assert_eq!(last_status(&app).0, StatusKind::Error);
    }

    #[test]
    fn test_from_settings_uses_built_in_font() {
        let settings = Settings::default();

        let app = FaceLensApp::from_settings(&settings, Box::new(NullStatusReporter), |_, _| {});

        assert!(app.is_ok());
    }

    #[test]
    fn test_from_settings_rejects_missing_font_override() {
        let settings = Settings {
            font_path: Some("/nonexistent/label.ttf".into()),
            ..Settings::default()
        };

        let result = FaceLensApp::from_settings(&settings, Box::new(NullStatusReporter), |_, _| {});

        let err = result.err().unwrap();
        assert!(err.to_string().contains("/nonexistent/label.ttf"));
    }
}
