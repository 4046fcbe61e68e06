use base64::Engine;

use crate::rendering::domain::canvas::{Canvas, RenderError};
use crate::shared::constants::LABEL_BASELINE_OFFSET;
use crate::shared::detection_box::{DetectionBox, DetectionSummary};

/// Annotated image plus the statistics shown next to it.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedResult {
    pub png: Vec<u8>,
    pub boxes: Vec<DetectionBox>,
    pub summary: DetectionSummary,
}

impl RenderedResult {
    /// The annotated PNG as a `data:` URL, usable as an `<img>` source.
    pub fn data_url(&self) -> String {
        png_data_url(&self.png)
    }
}

pub fn png_data_url(png: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(png);
    format!("data:image/png;base64,{b64}")
}

/// Outlines every box and labels it with its confidence percentage.
pub struct ResultRenderer;

impl ResultRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        canvas: &mut dyn Canvas,
        boxes: Vec<DetectionBox>,
    ) -> Result<RenderedResult, RenderError> {
        for (i, b) in boxes.iter().enumerate() {
            canvas.stroke_rect(b.x1, b.y1, b.x2, b.y2);
            canvas.fill_text(
                &b.confidence_label(),
                b.x1,
                b.y1 - LABEL_BASELINE_OFFSET as f64,
            );
            log::debug!(
                "Box {}: x={}, y={}, w={}, h={}, conf={}",
                i + 1,
                b.x1,
                b.y1,
                b.width(),
                b.height(),
                b.confidence
            );
        }

        let png = canvas.export_png()?;
        let summary = DetectionSummary::from_boxes(&boxes);
        Ok(RenderedResult {
            png,
            boxes,
            summary,
        })
    }
}

impl Default for ResultRenderer {
    fn default() -> Self {
        Self::new()
    }
}
