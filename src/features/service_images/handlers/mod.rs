pub mod service_image_handler;

pub use service_image_handler::*;
