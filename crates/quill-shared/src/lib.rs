//! # Quill Shared
//!
//! Wire types shared by the server and any client: submitted forms, view
//! models and response envelopes.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
