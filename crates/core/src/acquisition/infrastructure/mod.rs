pub mod image_crate_decoder;
pub mod image_file_source;
