//! Wire format of the remote decode endpoint.
//!
//! Request: `{ loc: {dims, data}, conf: {dims, data}, scale: [w, h, w, h],
//! resizeRatio }`. Response: `{ body: "<json string>" }` where the string
//! itself decodes to `{ boxes: [[x1, y1, x2, y2], ...], confidence:
//! [[score], ...] }`.

use serde::{Deserialize, Serialize};

use crate::decoding::domain::box_decoder::DecodeError;
use crate::inference::domain::face_network::{RawOutputs, RawTensor};
use crate::preprocessing::ResizeMetadata;
use crate::shared::detection_box::DetectionBox;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecodeRequest {
    pub loc: RawTensor,
    pub conf: RawTensor,
    pub scale: [u32; 4],
    #[serde(rename = "resizeRatio")]
    pub resize_ratio: f64,
}

impl DecodeRequest {
    pub fn new(outputs: RawOutputs, metadata: ResizeMetadata) -> Self {
        Self {
            loc: outputs.loc,
            conf: outputs.conf,
            scale: metadata.scale,
            resize_ratio: metadata.resize_ratio,
        }
    }
}

/// Outer API-gateway envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub body: String,
}

/// Inner payload carried as a string in [`GatewayResponse::body`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedBody {
    #[serde(default)]
    pub boxes: Option<Vec<[f64; 4]>>,
    #[serde(default)]
    pub confidence: Option<Vec<Vec<f64>>>,
}

impl DecodedBody {
    pub fn from_boxes(boxes: &[DetectionBox]) -> Self {
        Self {
            boxes: Some(boxes.iter().map(DetectionBox::coords).collect()),
            confidence: Some(boxes.iter().map(|b| vec![b.confidence]).collect()),
        }
    }

    /// Pairs each box with `confidence[i][0]`, or 0 when that is missing.
    pub fn into_boxes(self) -> Vec<DetectionBox> {
        let confidence = self.confidence.unwrap_or_default();
        self.boxes
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, coords)| {
                let score = confidence
                    .get(i)
                    .and_then(|c| c.first())
                    .copied()
                    .unwrap_or(0.0);
                DetectionBox::new(coords, score)
            })
            .collect()
    }
}

/// Parse the gateway response, including its JSON-in-a-string body.
pub fn parse_gateway_response(text: &str) -> Result<Vec<DetectionBox>, DecodeError> {
    let envelope: GatewayResponse = serde_json::from_str(text).map_err(DecodeError::Response)?;
    let body: DecodedBody = serde_json::from_str(&envelope.body).map_err(DecodeError::Body)?;
    Ok(body.into_boxes())
}

/// Wrap boxes the way the endpoint does; the inverse of
/// [`parse_gateway_response`].
pub fn encode_gateway_response(boxes: &[DetectionBox]) -> Result<String, serde_json::Error> {
    let body = serde_json::to_string(&DecodedBody::from_boxes(boxes))?;
    serde_json::to_string(&GatewayResponse { body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn outputs() -> RawOutputs {
        RawOutputs {
            loc: RawTensor {
                dims: vec![1, 2, 4],
                data: vec![0.5, -0.25, 0.0, 1.0, 0.1, 0.2, 0.3, 0.4],
            },
            conf: RawTensor {
                dims: vec![1, 2, 2],
                data: vec![0.9, 0.1, 0.2, 0.8],
            },
        }
    }

    #[test]
    fn test_request_serializes_documented_shape() {
        let request = DecodeRequest::new(
            outputs(),
            ResizeMetadata {
                scale: [640, 608, 640, 608],
                resize_ratio: 0.64,
            },
        );

        let value: Value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["loc"]["dims"], json!([1, 2, 4]));
        assert_eq!(value["conf"]["dims"], json!([1, 2, 2]));
        assert_eq!(value["conf"]["data"].as_array().unwrap().len(), 4);
        assert_eq!(value["scale"], json!([640, 608, 640, 608]));
        assert_eq!(value["resizeRatio"], json!(0.64));
        assert!(value.get("resize_ratio").is_none());
    }

    #[test]
    fn test_parses_double_encoded_body() {
        let text = r#"{"statusCode": 200, "body": "{\"boxes\": [[100, 100, 300, 300]], \"confidence\": [[0.95]]}"}"#;

        let boxes = parse_gateway_response(text).unwrap();

        assert_eq!(
            boxes,
            vec![DetectionBox::new([100.0, 100.0, 300.0, 300.0], 0.95)]
        );
    }

    #[test]
    fn test_round_trip_reproduces_boxes() {
        let boxes = vec![
            DetectionBox::new([12.5, 40.0, 88.25, 130.0], 0.9987),
            DetectionBox::new([300.0, 310.0, 420.0, 460.0], 0.5),
        ];

        let text = encode_gateway_response(&boxes).unwrap();

        assert_eq!(parse_gateway_response(&text).unwrap(), boxes);
    }

    #[test]
    fn test_missing_or_null_fields_mean_no_faces() {
        assert!(parse_gateway_response(r#"{"body": "{}"}"#)
            .unwrap()
            .is_empty());
        assert!(
            parse_gateway_response(r#"{"body": "{\"boxes\": null, \"confidence\": null}"}"#)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_missing_confidence_defaults_to_zero() {
        let text = r#"{"body": "{\"boxes\": [[0, 0, 10, 10], [5, 5, 20, 20]], \"confidence\": [[0.7]]}"}"#;

        let boxes = parse_gateway_response(text).unwrap();

        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].confidence, 0.7);
        assert_eq!(boxes[1].confidence, 0.0);
    }

    #[test]
    fn test_outer_parse_failure() {
        let err = parse_gateway_response("<html>502</html>").unwrap_err();
        assert!(matches!(err, DecodeError::Response(_)));
    }

    #[test]
    fn test_missing_body_field_is_outer_failure() {
        let err = parse_gateway_response(r#"{"message": "Internal server error"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Response(_)));
    }

    #[test]
    fn test_inner_parse_failure() {
        let err = parse_gateway_response(r#"{"body": "Traceback (most recent call last)"}"#)
            .unwrap_err();
        assert!(matches!(err, DecodeError::Body(_)));
        assert!(err.to_string().starts_with("Post-processing failed"));
    }
}
