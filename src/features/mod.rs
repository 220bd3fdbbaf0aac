pub mod auth;
pub mod contact;
pub mod images;
pub mod rate_limits;
pub mod service_images;
pub mod site;
pub mod uploads;
