//! # Inkwell Shared
//!
//! Wire types shared between the API server and its clients.
//! Field names follow the JSON the browser client already speaks.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
