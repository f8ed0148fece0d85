//! Authentication ports.

/// Signs and verifies the opaque session key carried in the session cookie.
pub trait SessionSigner: Send + Sync {
    /// Produce a tamper-proof token for a session key.
    fn sign(&self, session_key: &str) -> Result<String, AuthError>;

    /// Verify a token and return the session key it carries.
    fn verify(&self, token: &str) -> Result<String, AuthError>;

    /// How long a signed token stays valid.
    fn ttl_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash in constant time.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
