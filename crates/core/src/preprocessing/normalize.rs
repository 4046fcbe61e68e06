use ndarray::Array4;

use crate::shared::bitmap::{Bitmap, CHANNELS};
use crate::shared::constants::BGR_MEAN;

/// Network input: `(1, H, W, 3)` f32, BGR, mean-subtracted, unscaled.
#[derive(Clone, Debug, PartialEq)]
pub struct PreprocessedTensor(Array4<f32>);

impl PreprocessedTensor {
    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    /// `[b, g, r]` values at pixel `(x, y)`.
    pub fn bgr_at(&self, x: usize, y: usize) -> [f32; 3] {
        [
            self.0[[0, y, x, 0]],
            self.0[[0, y, x, 1]],
            self.0[[0, y, x, 2]],
        ]
    }

    pub fn as_array(&self) -> &Array4<f32> {
        &self.0
    }

    pub fn into_array(self) -> Array4<f32> {
        self.0
    }
}

/// Convert RGBA pixels into an interleaved BGR tensor.
///
/// Alpha is dropped; each channel has its mean from [`BGR_MEAN`] subtracted.
pub fn to_bgr_tensor(bitmap: &Bitmap) -> PreprocessedTensor {
    let height = bitmap.height() as usize;
    let width = bitmap.width() as usize;
    let data = bitmap.data();

    let tensor = Array4::from_shape_fn((1, height, width, 3), |(_, y, x, c)| {
        // BGR slot c reads RGBA channel 2 - c.
        let offset = (y * width + x) * CHANNELS + (2 - c);
        data[offset] as f32 - BGR_MEAN[c]
    });
    PreprocessedTensor(tensor)
}
