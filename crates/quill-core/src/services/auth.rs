//! Signup, login, session resolution and password changes.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::domain::{Role, User, mask_email, required};
use crate::error::DomainError;
use crate::ports::{
    AuthError, PasswordService, Session, SessionError, SessionSigner, SessionStore, UserRepository,
};

/// Signup form after extraction.
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

/// A freshly established session.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    /// Signed token for the session cookie.
    pub token: String,
    pub max_age_seconds: i64,
    pub user: User,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    signer: Arc<dyn SessionSigner>,
    sessions: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        signer: Arc<dyn SessionSigner>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            users,
            passwords,
            signer,
            sessions,
        }
    }

    /// Register a new account. Username and email must both be unused.
    pub async fn signup(&self, input: SignupInput) -> Result<User, DomainError> {
        let username = required("username", &input.username)?;
        let email = required("email", &input.email)?.to_ascii_lowercase();
        if !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }
        if input.password.is_empty() {
            return Err(DomainError::Validation("password is required".into()));
        }

        if self
            .users
            .find_by_username_or_email(&username, &email)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyExists("User already exists".into()));
        }

        let password_hash = self.passwords.hash(&input.password).map_err(internal)?;
        let user = User::new(username, email, password_hash, input.role.unwrap_or_default());
        let saved = self.users.save(user).await?;

        tracing::info!(user_id = %saved.id, email = %mask_email(&saved.email), "User signed up");
        Ok(saved)
    }

    /// Check credentials and open a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionGrant, DomainError> {
        let email = email.trim().to_ascii_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::not_found("user", mask_email(&email)))?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(internal)?;
        if !valid {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        let key = new_session_key();
        let ttl = self.signer.ttl_seconds();
        self.sessions
            .set(&key, &Session::new(user.id), Duration::from_secs(ttl.max(0) as u64))
            .await
            .map_err(session_failure)?;
        let token = self.signer.sign(&key).map_err(internal)?;

        tracing::info!(user_id = %user.id, "Session established");
        Ok(SessionGrant {
            token,
            max_age_seconds: ttl,
            user,
        })
    }

    /// Resolve a session cookie to its user. Missing, forged, expired or
    /// orphaned sessions resolve to `None`.
    pub async fn authenticate(&self, token: &str) -> Result<Option<User>, DomainError> {
        let key = match self.signer.verify(token) {
            Ok(key) => key,
            Err(e @ (AuthError::SessionExpired | AuthError::InvalidToken(_))) => {
                tracing::debug!(error = %e, "Ignoring session cookie");
                return Ok(None);
            }
            Err(e) => return Err(internal(e)),
        };

        let Some(session) = self.sessions.get(&key).await.map_err(session_failure)? else {
            return Ok(None);
        };

        match self.users.find_by_id(session.user_id).await? {
            Some(user) => Ok(Some(user)),
            None => {
                self.sessions.destroy(&key).await.map_err(session_failure)?;
                Ok(None)
            }
        }
    }

    /// End the session behind a cookie. Unknown or invalid tokens are ignored.
    pub async fn logout(&self, token: &str) -> Result<(), DomainError> {
        if let Ok(key) = self.signer.verify(token) {
            self.sessions.destroy(&key).await.map_err(session_failure)?;
        }
        Ok(())
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), DomainError> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))?;

        let valid = self
            .passwords
            .verify(old_password, &user.password_hash)
            .map_err(internal)?;
        if !valid {
            return Err(DomainError::InvalidCredentials);
        }
        if new_password.is_empty() {
            return Err(DomainError::Validation("New password is required".into()));
        }
        if new_password != confirm_password {
            return Err(DomainError::Validation(
                "New password and confirmation do not match".into(),
            ));
        }

        user.password_hash = self.passwords.hash(new_password).map_err(internal)?;
        user.touch();
        self.users.save(user).await?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}

fn new_session_key() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

fn internal(err: AuthError) -> DomainError {
    DomainError::Internal(err.to_string())
}

fn session_failure(err: SessionError) -> DomainError {
    DomainError::Persistence(err.to_string())
}
