use std::path::PathBuf;

use thiserror::Error;

use crate::inference::domain::face_network::BoxedError;
use crate::shared::bitmap::Bitmap;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to encode PNG: {0}")]
    Encode(#[source] BoxedError),
    #[error("failed to read font {path}: {source}")]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a usable font")]
    InvalidFont { path: PathBuf },
}

/// Drawing surface capabilities needed to annotate a result.
///
/// Coordinates are in image pixels and may fall outside the surface; such
/// drawing is clipped.
pub trait Canvas {
    fn dimensions(&self) -> (u32, u32);

    /// Outline the rectangle spanned by `(x1, y1)` and `(x2, y2)`.
    fn stroke_rect(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);

    /// Draw `text` with its baseline starting at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    fn export_png(&self) -> Result<Vec<u8>, RenderError>;
}

/// Creates a canvas showing `background` at its natural size.
pub trait CanvasFactory: Send {
    fn create(&self, background: &Bitmap) -> Box<dyn Canvas>;
}
