use std::time::Duration;

use crate::decoding::domain::box_decoder::{BoxDecoder, DecodeError};
use crate::decoding::domain::decode_request::{parse_gateway_response, DecodeRequest};
use crate::shared::detection_box::DetectionBox;

/// Client for the serverless decode endpoint.
///
/// One JSON `POST` per detection, no authentication. Transport failures
/// (connect, timeout, dropped connection) are retried up to `retries`
/// times; HTTP error statuses and malformed responses are not.
pub struct HttpBoxDecoder {
    client: reqwest::blocking::Client,
    endpoint: String,
    retries: u32,
}

impl HttpBoxDecoder {
    /// `timeout: None` waits indefinitely.
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
        retries: u32,
    ) -> Result<Self, DecodeError> {
        let endpoint = endpoint.into();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DecodeError::Transport {
                url: endpoint.clone(),
                source: Box::new(e),
            })?;
        Ok(Self {
            client,
            endpoint,
            retries,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn post(&self, request: &DecodeRequest) -> Result<String, reqwest::Error> {
        self.client
            .post(&self.endpoint)
            .json(request)
            .send()?
            .error_for_status()?
            .text()
    }
}

impl BoxDecoder for HttpBoxDecoder {
    fn decode(&self, request: &DecodeRequest) -> Result<Vec<DetectionBox>, DecodeError> {
        let mut attempt = 0;
        let text = loop {
            match self.post(request) {
                Ok(text) => break text,
                Err(e) if e.is_status() => {
                    return Err(DecodeError::Status {
                        status: e.status().map(|s| s.as_u16()).unwrap_or_default(),
                    });
                }
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    log::warn!("Decode request failed ({e}); retry {attempt}/{}", self.retries);
                }
                Err(e) => {
                    return Err(DecodeError::Transport {
                        url: self.endpoint.clone(),
                        source: Box::new(e),
                    });
                }
            }
        };

        let boxes = parse_gateway_response(&text)?;
        log::debug!("Endpoint returned {} boxes", boxes.len());
        Ok(boxes)
    }
}
