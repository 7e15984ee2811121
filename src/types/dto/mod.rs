// Request/response models exposed through the OpenAPI surface
pub mod common;
pub mod session;
