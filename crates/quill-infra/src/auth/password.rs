//! Account password hashing.
//!
//! Signup and password changes store the PHC string produced here in
//! `users.password_hash`; login checks the submitted password against it.

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use quill_core::ports::{AuthError, PasswordService};

/// Argon2id with a fresh random salt per account.
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    /// `Ok(false)` only for a wrong password. A stored hash that cannot be
    /// parsed or checked is an error, never a silent mismatch.
    fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        let stored = PasswordHash::new(stored).map_err(|e| AuthError::HashingError(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &stored) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::HashingError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_account_gets_its_own_salt() {
        let hasher = Argon2PasswordHasher::new();
        let password = "correct horse";

        let alice = hasher.hash(password).unwrap();
        let bob = hasher.hash(password).unwrap();
        assert_ne!(alice, bob);
        assert!(alice.starts_with("$argon2id$"));
        assert!(!alice.contains(password));

        assert!(hasher.verify(password, &alice).unwrap());
        assert!(hasher.verify(password, &bob).unwrap());
        assert!(!hasher.verify("battery staple", &alice).unwrap());
    }

    #[test]
    fn corrupt_stored_hash_is_an_error() {
        let hasher = Argon2PasswordHasher::new();
        assert!(matches!(
            hasher.verify("pw", "not-a-phc-string"),
            Err(AuthError::HashingError(_))
        ));
        // Parses, but names an algorithm Argon2 cannot check
        assert!(matches!(
            hasher.verify("pw", "$pbkdf2-sha256$i=1000$c2FsdHNhbHQ$aGFzaGhhc2hoYXNo"),
            Err(AuthError::HashingError(_))
        ));
    }
}
