pub mod image_decoder;
pub mod uploaded_image;
