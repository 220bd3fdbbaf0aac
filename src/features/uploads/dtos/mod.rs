pub mod upload_dto;

pub use upload_dto::*;
