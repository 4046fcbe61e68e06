pub mod execution_provider;
pub mod lazy_network;
pub mod onnx_retinaface_network;
