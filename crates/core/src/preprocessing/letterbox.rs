use image::imageops::{self, FilterType};

use crate::shared::bitmap::{Bitmap, CHANNELS};
use crate::shared::constants::{TARGET_HEIGHT, TARGET_WIDTH};

/// Opaque black, the fill behind the scaled image.
const PAD_RGBA: [u8; 4] = [0, 0, 0, 255];

/// Network input size. Height comes first, matching the tensor layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetSize {
    pub height: u32,
    pub width: u32,
}

impl Default for TargetSize {
    fn default() -> Self {
        Self {
            height: TARGET_HEIGHT,
            width: TARGET_WIDTH,
        }
    }
}

/// Output of [`letterbox`]: a bitmap of exactly the target size.
#[derive(Clone, Debug)]
pub struct Letterboxed {
    pub bitmap: Bitmap,
    /// Uniform factor applied to the source; 0 when stretched.
    pub resize_ratio: f64,
    /// Size of the scaled source before padding, `(width, height)`.
    pub scaled_size: (u32, u32),
}

/// Scale `src` to fit inside `target` keeping its aspect ratio, then pad.
///
/// With `ratio = target.height / target.width`, a source whose
/// `height / width` is at most `ratio` is fitted to the target width
/// (height floored), otherwise to the target height (width floored). The
/// scaled image is anchored at the top-left corner; the rest is black.
pub fn letterbox(src: &Bitmap, target: TargetSize) -> Letterboxed {
    let (sw, sh) = (src.width() as f64, src.height() as f64);
    if sw == 0.0 || sh == 0.0 {
        return Letterboxed {
            bitmap: Bitmap::filled(target.width, target.height, PAD_RGBA),
            resize_ratio: 0.0,
            scaled_size: (0, 0),
        };
    }

    let ratio = target.height as f64 / target.width as f64;
    let (resize_ratio, scaled_w, scaled_h) = if sh / sw <= ratio {
        let r = target.width as f64 / sw;
        (r, target.width, (sh * r).floor() as u32)
    } else {
        let r = target.height as f64 / sh;
        (r, (sw * r).floor() as u32, target.height)
    };

    // Extremely thin sources can floor to zero; keep at least one row/column.
    let scaled_w = scaled_w.max(1);
    let scaled_h = scaled_h.max(1);

    let scaled = resample(src, scaled_w, scaled_h);
    Letterboxed {
        bitmap: pad_to(&scaled, target),
        resize_ratio,
        scaled_size: (scaled_w, scaled_h),
    }
}

/// Resize to exactly `target`, ignoring aspect ratio.
pub fn stretch(src: &Bitmap, target: TargetSize) -> Letterboxed {
    if src.width() == 0 || src.height() == 0 {
        return letterbox(src, target);
    }
    Letterboxed {
        bitmap: resample(src, target.width, target.height),
        resize_ratio: 0.0,
        scaled_size: (target.width, target.height),
    }
}

fn resample(src: &Bitmap, width: u32, height: u32) -> Bitmap {
    let resized = imageops::resize(&src.to_rgba_image(), width, height, FilterType::Triangle);
    Bitmap::from(resized)
}

/// Copy `img` into the top-left of a padded canvas, clipping any overflow.
fn pad_to(img: &Bitmap, target: TargetSize) -> Bitmap {
    let mut canvas = Bitmap::filled(target.width, target.height, PAD_RGBA);

    let copy_w = img.width().min(target.width) as usize * CHANNELS;
    let rows = img.height().min(target.height) as usize;
    let src_stride = img.width() as usize * CHANNELS;
    let dst_stride = target.width as usize * CHANNELS;

    let src = img.data();
    let dst = canvas.data_mut();
    for y in 0..rows {
        let s = y * src_stride;
        let d = y * dst_stride;
        dst[d..d + copy_w].copy_from_slice(&src[s..s + copy_w]);
    }
    canvas
}
