//! JWT signer for session cookies.
//!
//! The cookie carries only the opaque session key; the session itself lives
//! in the session store so logout can revoke it.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use quill_core::ports::{AuthError, SessionSigner};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// Session signer configuration.
#[derive(Debug, Clone)]
pub struct SessionTokenConfig {
    pub secret: String,
    pub ttl_hours: i64,
    pub issuer: String,
}

impl Default for SessionTokenConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            ttl_hours: 24,
            issuer: "quill".to_string(),
        }
    }
}

impl SessionTokenConfig {
    pub fn from_env() -> Self {
        let secret = std::env::var("SESSION_SECRET").unwrap_or_else(|_| DEFAULT_SECRET.to_string());

        // Warn if using default secret in production
        if secret == DEFAULT_SECRET {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default session secret in production! Set SESSION_SECRET."
                );
            } else {
                tracing::warn!("Using default session secret. Set SESSION_SECRET for production use.");
            }
        }

        Self {
            secret,
            ttl_hours: std::env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24),
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "quill".to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sid: String,
    exp: i64,
    iat: i64,
    iss: String,
}

/// HS256 signer keyed by the session secret.
pub struct JwtSessionSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: SessionTokenConfig,
}

impl JwtSessionSigner {
    pub fn new(config: SessionTokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }
}

impl SessionSigner for JwtSessionSigner {
    fn sign(&self, session_key: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::hours(self.config.ttl_hours);

        let claims = Claims {
            sid: session_key.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<String, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::SessionExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims.sid)
    }

    fn ttl_seconds(&self) -> i64 {
        self.config.ttl_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SessionTokenConfig {
        SessionTokenConfig {
            secret: "test-secret-key".to_string(),
            ttl_hours: 1,
            issuer: "test-issuer".to_string(),
        }
    }

    #[test]
    fn signed_token_round_trips_session_key() {
        let signer = JwtSessionSigner::new(test_config());
        let token = signer.sign("abc123").unwrap();

        assert!(!token.contains("abc123"));
        assert_eq!(signer.verify(&token).unwrap(), "abc123");
    }

    #[test]
    fn garbage_token_is_invalid() {
        let signer = JwtSessionSigner::new(test_config());
        assert!(matches!(
            signer.verify("invalid-token"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let ours = JwtSessionSigner::new(test_config());
        let theirs = JwtSessionSigner::new(SessionTokenConfig {
            secret: "another-secret".to_string(),
            ..test_config()
        });

        let token = theirs.sign("abc").unwrap();
        assert!(ours.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let signer = JwtSessionSigner::new(SessionTokenConfig {
            ttl_hours: -2,
            ..test_config()
        });

        let token = signer.sign("abc").unwrap();
        assert!(matches!(signer.verify(&token), Err(AuthError::SessionExpired)));
    }

    #[test]
    fn ttl_matches_config() {
        let signer = JwtSessionSigner::new(SessionTokenConfig {
            ttl_hours: 24,
            ..test_config()
        });
        assert_eq!(signer.ttl_seconds(), 86400);
    }
}
