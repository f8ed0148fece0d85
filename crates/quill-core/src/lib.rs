//! # Quill Core
//!
//! The domain layer of the Quill blog: entities, ports and services.
//! This crate has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
