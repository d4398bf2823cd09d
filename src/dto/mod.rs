//! DTOs de la API
//!
//! Formas de request y response serializadas en los endpoints JSON.

pub mod api_dto;
pub mod vehicle_dto;

pub use api_dto::ApiResponse;
pub use vehicle_dto::*;
