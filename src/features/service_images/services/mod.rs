pub mod service_image_service;

pub use service_image_service::ServiceImageService;
