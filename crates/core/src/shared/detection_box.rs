/// A face returned by the remote decoder, in original-image pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub confidence: f64,
}

impl DetectionBox {
    pub fn new(coords: [f64; 4], confidence: f64) -> Self {
        Self {
            x1: coords[0],
            y1: coords[1],
            x2: coords[2],
            y2: coords[3],
            confidence,
        }
    }

    pub fn coords(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Confidence as a percentage with one decimal, e.g. `95.0%`.
    pub fn confidence_label(&self) -> String {
        format_percent(self.confidence)
    }
}

/// Statistics shown alongside the annotated image.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionSummary {
    pub faces: usize,
    /// Mean confidence in `[0, 1]`; `None` when no face was found.
    pub average_confidence: Option<f64>,
}

impl DetectionSummary {
    pub fn from_boxes(boxes: &[DetectionBox]) -> Self {
        let average_confidence = if boxes.is_empty() {
            None
        } else {
            Some(boxes.iter().map(|b| b.confidence).sum::<f64>() / boxes.len() as f64)
        };
        Self {
            faces: boxes.len(),
            average_confidence,
        }
    }

    /// Results panel text, one entry per line.
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Faces Detected: {}", self.faces)];
        if let Some(avg) = self.average_confidence {
            lines.push(format!("Average Confidence: {}", format_percent(avg)));
        }
        lines
    }
}

fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}
