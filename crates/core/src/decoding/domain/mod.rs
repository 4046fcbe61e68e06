pub mod box_decoder;
pub mod decode_request;
