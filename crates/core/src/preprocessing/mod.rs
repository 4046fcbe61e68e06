//! Fixed RetinaFace input recipe: letterbox to 608x640, then BGR mean
//! subtraction into an NHWC float tensor.

pub mod letterbox;
pub mod normalize;

use crate::shared::bitmap::Bitmap;

use self::letterbox::{letterbox, stretch, TargetSize};
use self::normalize::{to_bgr_tensor, PreprocessedTensor};

/// What the remote decoder needs to map detections back to source pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeMetadata {
    /// `[width, height, width, height]` of the network input.
    pub scale: [u32; 4],
    pub resize_ratio: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreprocessOptions {
    pub target: TargetSize,
    pub keep_ratio: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            target: TargetSize::default(),
            keep_ratio: true,
        }
    }
}

pub fn preprocess(
    bitmap: &Bitmap,
    options: &PreprocessOptions,
) -> (PreprocessedTensor, ResizeMetadata) {
    let target = options.target;
    let resized = if options.keep_ratio {
        letterbox(bitmap, target)
    } else {
        stretch(bitmap, target)
    };
    log::debug!(
        "Letterboxed {}x{} → {}x{} (ratio {:.4})",
        bitmap.width(),
        bitmap.height(),
        resized.scaled_size.0,
        resized.scaled_size.1,
        resized.resize_ratio
    );

    let tensor = to_bgr_tensor(&resized.bitmap);
    let metadata = ResizeMetadata {
        scale: [target.width, target.height, target.width, target.height],
        resize_ratio: resized.resize_ratio,
    };
    (tensor, metadata)
}
