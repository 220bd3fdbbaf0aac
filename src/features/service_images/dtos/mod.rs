pub mod service_image_dto;

pub use service_image_dto::*;
