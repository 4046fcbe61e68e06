use std::io::Cursor;
use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale};
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::rendering::domain::canvas::{Canvas, CanvasFactory, RenderError};
use crate::shared::bitmap::Bitmap;
use crate::shared::constants::{BOX_COLOR, BOX_LINE_WIDTH, LABEL_FONT_PX};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasStyle {
    /// Stroke width, centred on the rectangle edge.
    pub line_width: u32,
    pub font_px: f32,
    pub color: [u8; 4],
}

impl Default for CanvasStyle {
    fn default() -> Self {
        Self {
            line_width: BOX_LINE_WIDTH,
            font_px: LABEL_FONT_PX,
            color: BOX_COLOR,
        }
    }
}

/// Label font compiled into the binary; `Settings::font_path` overrides it.
const DEFAULT_FONT: &[u8] = include_bytes!("../../../assets/DejaVuSans.ttf");

pub fn default_font() -> Result<FontArc, RenderError> {
    FontArc::try_from_slice(DEFAULT_FONT).map_err(|_| RenderError::InvalidFont {
        path: PathBuf::from("<built-in DejaVuSans.ttf>"),
    })
}

/// Raster canvas over an `image` buffer, drawn with `imageproc`.
pub struct ImageCanvas {
    image: RgbaImage,
    style: CanvasStyle,
    font: FontArc,
}

impl ImageCanvas {
    pub fn new(background: &Bitmap, style: CanvasStyle, font: FontArc) -> Self {
        Self {
            image: background.to_rgba_image(),
            style,
            font,
        }
    }

    pub fn into_bitmap(self) -> Bitmap {
        Bitmap::from(self.image)
    }

    /// Limits a coordinate to the canvas plus a margin wider than the
    /// stroke, so off-canvas edges stay off-canvas and arithmetic stays small.
    fn clamp_coord(&self, v: f64, extent: u32) -> i64 {
        let margin = self.style.line_width as f64 + 1.0;
        if v.is_nan() {
            return 0;
        }
        v.clamp(-margin, extent as f64 + margin).round() as i64
    }
}

impl Canvas for ImageCanvas {
    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn stroke_rect(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let (cw, ch) = self.image.dimensions();
        let (ax, bx) = (self.clamp_coord(x1, cw), self.clamp_coord(x2, cw));
        let (ay, by) = (self.clamp_coord(y1, ch), self.clamp_coord(y2, ch));
        let (left, top) = (ax.min(bx), ay.min(by));
        let (width, height) = ((ax - bx).abs(), (ay - by).abs());
        let half = i64::from(self.style.line_width / 2);
        let color = Rgba(self.style.color);

        // Concentric 1px outlines, outermost first.
        for d in 0..i64::from(self.style.line_width) {
            let w = width + 2 * half - 2 * d;
            let h = height + 2 * half - 2 * d;
            if w <= 0 || h <= 0 {
                break;
            }
            let rect = Rect::at((left - half + d) as i32, (top - half + d) as i32)
                .of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut self.image, rect, color);
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let (cw, ch) = self.image.dimensions();
        let font_px = self.style.font_px as f64;
        if x.is_nan() || y.is_nan() || x >= cw as f64 || y - font_px >= ch as f64 {
            return;
        }
        // Labels starting further left than one canvas width are never visible.
        let left = x.max(-(cw as f64)).round() as i32;
        let top = (y - font_px).max(-(ch as f64) - font_px).round() as i32;
        draw_text_mut(
            &mut self.image,
            Rgba(self.style.color),
            left,
            top,
            PxScale::from(self.style.font_px),
            &self.font,
            text,
        );
    }

    fn export_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut buf = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| RenderError::Encode(Box::new(e)))?;
        Ok(buf)
    }
}

/// Builds [`ImageCanvas`]es sharing one style and font.
pub struct ImageCanvasFactory {
    style: CanvasStyle,
    font: FontArc,
}

impl ImageCanvasFactory {
    /// Factory using the built-in label font.
    pub fn new(style: CanvasStyle) -> Result<Self, RenderError> {
        Ok(Self {
            style,
            font: default_font()?,
        })
    }

    /// Replaces the built-in font with the TrueType file at `path`.
    pub fn with_font_file(mut self, path: &Path) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path).map_err(|source| RenderError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.font = FontArc::try_from_vec(bytes).map_err(|_| RenderError::InvalidFont {
            path: path.to_path_buf(),
        })?;
        Ok(self)
    }
}

impl CanvasFactory for ImageCanvasFactory {
    fn create(&self, background: &Bitmap) -> Box<dyn Canvas> {
        Box::new(ImageCanvas::new(background, self.style, self.font.clone()))
    }
}
