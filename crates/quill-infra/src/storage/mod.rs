//! Local file storage for uploads.

mod local;

pub use local::{LocalFileStore, validate_flat_filename};
