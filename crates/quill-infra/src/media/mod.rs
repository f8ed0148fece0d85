//! Media hosts: Cloudinary, with an in-memory stand-in.

mod memory;

pub use memory::InMemoryMediaHost;

#[cfg(feature = "cloudinary")]
mod cloudinary;

#[cfg(feature = "cloudinary")]
pub use self::cloudinary::{CloudinaryConfig, CloudinaryMediaHost};
