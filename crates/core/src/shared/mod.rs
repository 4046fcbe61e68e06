pub mod bitmap;
pub mod constants;
pub mod detection_box;
pub mod model_resolver;
pub mod settings;
