//! Session identity extractors.
//!
//! The session cookie carries a signed token naming a server-side session.
//! Resolution goes through [`AuthService::authenticate`], so a logged-out or
//! expired session is treated exactly like a missing cookie.
//!
//! [`AuthService::authenticate`]: quill_core::services::AuthService::authenticate

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;

use quill_core::domain::{Role, User};

use super::error::{AppError, Rejection};
use super::negotiate::ResponseMode;
use crate::config::CookieConfig;
use crate::state::AppState;

/// Authenticated user identity extractor.
///
/// Use this in handlers to require a session:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: User,
    /// The raw cookie value, needed to end the session.
    pub token: String,
}

impl Identity {
    pub fn id(&self) -> uuid::Uuid {
        self.user.id
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.user.role == role
    }
}

async fn resolve(req: &HttpRequest) -> Result<Option<Identity>, Rejection> {
    let mode = ResponseMode::detect(req);
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        Rejection::new(
            AppError::Internal("Server configuration error".to_string()),
            mode,
        )
    })?;

    let Some(token) = req
        .cookie(&state.cookie.name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
    else {
        return Ok(None);
    };

    match state.auth.authenticate(&token).await {
        Ok(Some(user)) => Ok(Some(Identity { user, token })),
        Ok(None) => Ok(None),
        Err(e) => Err(Rejection::new(e, mode)),
    }
}

impl FromRequest for Identity {
    type Error = Rejection;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            resolve(&req).await?.ok_or_else(|| {
                Rejection::new(AppError::Unauthorized, ResponseMode::detect(&req))
            })
        })
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = Rejection;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { Ok(OptionalIdentity(resolve(&req).await?)) })
    }
}

/// Cookie carrying a freshly signed session token.
pub fn session_cookie(config: &CookieConfig, token: String, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build(config.name.clone(), token)
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

/// Cookie that clears the session.
pub fn cleared_session_cookie(config: &CookieConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build(config.name.clone(), "").path("/").finish();
    cookie.make_removal();
    cookie
}
