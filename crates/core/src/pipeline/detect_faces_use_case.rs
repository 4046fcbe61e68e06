use crate::decoding::domain::box_decoder::BoxDecoder;
use crate::decoding::domain::decode_request::DecodeRequest;
use crate::inference::domain::face_network::FaceNetwork;
use crate::inference::infrastructure::lazy_network::LazyNetwork;
use crate::pipeline::status_reporter::{StatusKind, StatusReporter};
use crate::preprocessing::{preprocess, PreprocessOptions};
use crate::rendering::domain::canvas::CanvasFactory;
use crate::rendering::result_renderer::{RenderedResult, ResultRenderer};
use crate::shared::bitmap::Bitmap;

/// Single-image detection: preprocess → infer → remote decode → render.
///
/// The network is loaded on the first call and reused afterwards.
pub struct DetectFacesUseCase {
    network: LazyNetwork,
    decoder: Box<dyn BoxDecoder>,
    canvas_factory: Box<dyn CanvasFactory>,
    renderer: ResultRenderer,
    options: PreprocessOptions,
}

impl DetectFacesUseCase {
    pub fn new(
        network: LazyNetwork,
        decoder: Box<dyn BoxDecoder>,
        canvas_factory: Box<dyn CanvasFactory>,
        options: PreprocessOptions,
    ) -> Self {
        Self {
            network,
            decoder,
            canvas_factory,
            renderer: ResultRenderer::new(),
            options,
        }
    }

    pub fn is_network_loaded(&self) -> bool {
        self.network.is_loaded()
    }

    /// Runs detection on `image` and draws the results over a copy of it.
    ///
    /// Any failure aborts the whole attempt; nothing partial is returned.
    pub fn execute(
        &mut self,
        image: &Bitmap,
        status: &mut dyn StatusReporter,
    ) -> Result<RenderedResult, Box<dyn std::error::Error>> {
        status.report(StatusKind::Loading, "Loading RetinaFace model...");
        if !self.network.is_loaded() {
            status.report(
                StatusKind::Loading,
                "Downloading RetinaFace model from Hugging Face...",
            );
            self.network.get()?;
        }

        status.report(StatusKind::Loading, "Processing image...");
        let (tensor, metadata) = preprocess(image, &self.options);
        let outputs = self.network.run(tensor)?;
        log::debug!(
            "Network outputs: loc {:?}, conf {:?}",
            outputs.loc.dims,
            outputs.conf.dims
        );

        let request = DecodeRequest::new(outputs, metadata);
        let boxes = self.decoder.decode(&request)?;
        log::info!("Detected {} faces", boxes.len());

        let mut canvas = self.canvas_factory.create(image);
        let result = self.renderer.render(canvas.as_mut(), boxes)?;
        Ok(result)
    }
}
