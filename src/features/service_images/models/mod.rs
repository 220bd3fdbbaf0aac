pub mod service_image;

pub use service_image::{ServiceCategory, ServiceImage};
