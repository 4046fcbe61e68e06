use thiserror::Error;

use crate::decoding::domain::decode_request::DecodeRequest;
use crate::inference::domain::face_network::BoxedError;
use crate::shared::detection_box::DetectionBox;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Post-processing failed: request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxedError,
    },
    #[error("Post-processing failed: endpoint returned HTTP {status}")]
    Status { status: u16 },
    #[error("Post-processing failed: malformed response: {0}")]
    Response(#[source] serde_json::Error),
    #[error("Post-processing failed: malformed response body: {0}")]
    Body(#[source] serde_json::Error),
}

/// Turns raw network outputs into boxes in source-image coordinates.
///
/// Decoding, thresholding and NMS all happen behind this interface.
pub trait BoxDecoder: Send {
    fn decode(&self, request: &DecodeRequest) -> Result<Vec<DetectionBox>, DecodeError>;
}
