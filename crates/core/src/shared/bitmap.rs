use image::{Rgba, RgbaImage};
use thiserror::Error;

/// Bytes per pixel of a [`Bitmap`] (RGBA).
pub const CHANNELS: usize = 4;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("bitmap data has {actual} bytes, expected {expected} for {width}x{height} RGBA")]
pub struct BitmapSizeError {
    pub width: u32,
    pub height: u32,
    pub expected: usize,
    pub actual: usize,
}

/// A decoded image: contiguous RGBA bytes, row-major, top-to-bottom.
///
/// Mirrors the pixel layout a 2D canvas hands back, so the preprocessing
/// recipe can be expressed against it directly. The byte length always
/// matches the dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    image: RgbaImage,
}

impl Bitmap {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, BitmapSizeError> {
        let expected = (width as usize) * (height as usize) * CHANNELS;
        let actual = data.len();
        RgbaImage::from_raw(width, height, data)
            .filter(|_| actual == expected)
            .map(|image| Self { image })
            .ok_or(BitmapSizeError {
                width,
                height,
                expected,
                actual,
            })
    }

    /// A bitmap of the given size where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(rgba)),
        }
    }

    pub fn data(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Copies the pixels into an `image` buffer for resampling or drawing.
    pub fn to_rgba_image(&self) -> RgbaImage {
        self.image.clone()
    }
}

impl From<RgbaImage> for Bitmap {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}
