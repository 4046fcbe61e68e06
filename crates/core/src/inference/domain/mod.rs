pub mod face_network;
