//! Middleware and request extractors.

pub mod auth;
pub mod error;
pub mod form;
pub mod negotiate;
