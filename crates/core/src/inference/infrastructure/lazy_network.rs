use crate::inference::domain::face_network::{FaceNetwork, InferenceError, RawOutputs};
use crate::preprocessing::normalize::PreprocessedTensor;

/// Produces a ready network; called until it first succeeds.
pub type NetworkLoader = Box<dyn FnMut() -> Result<Box<dyn FaceNetwork>, InferenceError> + Send>;

/// Loads the network on first use and keeps it for the rest of the session.
///
/// A failed load leaves nothing cached, so the next call tries again. There
/// is no invalidation once a network is held.
pub struct LazyNetwork {
    loader: NetworkLoader,
    network: Option<Box<dyn FaceNetwork>>,
}

impl LazyNetwork {
    pub fn new(loader: NetworkLoader) -> Self {
        Self {
            loader,
            network: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.network.is_some()
    }

    /// Returns the cached network, loading it first if needed.
    pub fn get(&mut self) -> Result<&mut Box<dyn FaceNetwork>, InferenceError> {
        let network = match self.network.take() {
            Some(network) => network,
            None => {
                log::info!("Loading face detection network");
                (self.loader)()?
            }
        };
        Ok(self.network.insert(network))
    }
}

impl FaceNetwork for LazyNetwork {
    fn run(&mut self, input: PreprocessedTensor) -> Result<RawOutputs, InferenceError> {
        self.get()?.run(input)
    }
}
