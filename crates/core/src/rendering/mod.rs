pub mod domain;
pub mod infrastructure;
pub mod result_renderer;
