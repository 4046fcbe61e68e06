/// RetinaFace network executed with ONNX Runtime via `ort`.
///
/// Only runs the graph. Anchor decoding and NMS happen remotely, so the two
/// output heads are handed back untouched.
use std::fmt::Display;
use std::path::{Path, PathBuf};

use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;

use crate::inference::domain::face_network::{
    FaceNetwork, InferenceError, RawOutputs, RawTensor,
};
use crate::preprocessing::normalize::PreprocessedTensor;
use crate::shared::constants::RETINAFACE_INPUT_NAME;
use crate::shared::model_resolver::{self, ProgressFn};

use super::execution_provider::cpu_execution_providers;
use super::lazy_network::NetworkLoader;

/// Values per anchor in the location head (dx, dy, dw, dh).
const LOC_VALUES: usize = 4;

pub struct OnnxRetinafaceNetwork {
    session: Session,
}

impl OnnxRetinafaceNetwork {
    /// Build a CPU session with full graph optimisation.
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        let session = Session::builder()
            .map_err(load_error)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(load_error)?
            .with_execution_providers(cpu_execution_providers())
            .map_err(load_error)?
            .commit_from_file(model_path)
            .map_err(load_error)?;

        log::info!(
            "Model inputs: {:?}",
            session.inputs().iter().map(|i| i.name()).collect::<Vec<_>>()
        );
        log::info!(
            "Model outputs: {:?}",
            session.outputs().iter().map(|o| o.name()).collect::<Vec<_>>()
        );

        Ok(Self { session })
    }
}

impl FaceNetwork for OnnxRetinafaceNetwork {
    fn run(&mut self, input: PreprocessedTensor) -> Result<RawOutputs, InferenceError> {
        let value = ort::value::Tensor::from_array(input.into_array()).map_err(run_error)?;
        let outputs = self
            .session
            .run(ort::inputs![RETINAFACE_INPUT_NAME => value])
            .map_err(run_error)?;

        if outputs.len() < 2 {
            return Err(InferenceError::MissingOutputs {
                found: outputs.len(),
            });
        }

        let loc = raw_tensor(outputs[0].try_extract_array::<f32>().map_err(run_error)?);
        let conf = raw_tensor(outputs[1].try_extract_array::<f32>().map_err(run_error)?);

        if loc.dims.last().copied() != Some(LOC_VALUES as i64) {
            log::warn!(
                "Output 0 has shape {:?}; expected the location head (last dim {LOC_VALUES})",
                loc.dims
            );
        }

        Ok(RawOutputs { loc, conf })
    }
}

/// Loader that resolves the model file (cache, then `models_dir`, then
/// download) and opens it.
pub fn retinaface_loader(
    model_name: String,
    model_url: String,
    models_dir: Option<PathBuf>,
    progress: fn(u64, u64),
) -> NetworkLoader {
    Box::new(move || {
        let progress: ProgressFn = Box::new(progress);
        let path = model_resolver::resolve(
            &model_name,
            &model_url,
            models_dir.as_deref(),
            Some(progress),
        )
            .map_err(|e| InferenceError::Load(Box::new(e)))?;
        let network = OnnxRetinafaceNetwork::load(&path)?;
        Ok(Box::new(network) as Box<dyn FaceNetwork>)
    })
}

fn raw_tensor(view: ndarray::ArrayViewD<'_, f32>) -> RawTensor {
    RawTensor {
        dims: view.shape().iter().map(|&d| d as i64).collect(),
        data: view.iter().copied().collect(),
    }
}

fn load_error(e: impl Display) -> InferenceError {
    InferenceError::Load(e.to_string().into())
}

fn run_error(e: impl Display) -> InferenceError {
    InferenceError::Run(e.to_string().into())
}
