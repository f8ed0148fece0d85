//! Session stores - Redis and in-memory fallback.

mod memory;

pub use memory::InMemorySessionStore;

#[cfg(feature = "redis")]
mod redis;
#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisSessionStore};
