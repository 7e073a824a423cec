//! DTOs de la API HTTP

pub mod api_response;
pub mod rental_dto;

pub use api_response::ApiResponse;
pub use rental_dto::{ActionOutcome, CheckoutRequest, ConfirmRequest};
