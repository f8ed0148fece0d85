//! Authentication implementations.

mod jwt;
mod password;

pub use jwt::{JwtSessionSigner, SessionTokenConfig};
pub use password::Argon2PasswordHasher;
