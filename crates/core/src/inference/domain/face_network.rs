use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::preprocessing::normalize::PreprocessedTensor;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Failed to load RetinaFace model: {0}")]
    Load(#[source] BoxedError),
    #[error("inference failed: {0}")]
    Run(#[source] BoxedError),
    #[error("model produced {found} outputs, expected location and confidence")]
    MissingOutputs { found: usize },
}

/// A raw network output: its dimensions plus the flat row-major values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawTensor {
    pub dims: Vec<i64>,
    pub data: Vec<f32>,
}

/// The two RetinaFace heads as an ordered pair.
///
/// Taken from the session by position (0 = location, 1 = confidence), not
/// by name. Nothing checks that a different model export keeps that order.
#[derive(Clone, Debug, PartialEq)]
pub struct RawOutputs {
    pub loc: RawTensor,
    pub conf: RawTensor,
}

/// Domain interface for running the detection network.
///
/// The input tensor is consumed by the call.
pub trait FaceNetwork: Send {
    fn run(&mut self, input: PreprocessedTensor) -> Result<RawOutputs, InferenceError>;
}
