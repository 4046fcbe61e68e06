pub mod http_box_decoder;
