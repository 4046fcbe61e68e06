pub mod app_state;
pub mod detect_faces_use_case;
pub mod download_model_use_case;
pub mod face_lens_app;
pub mod status_reporter;
