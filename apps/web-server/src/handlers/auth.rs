//! Login, signup, logout and password change.

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use quill_core::domain::Role;
use quill_core::services::SignupInput;
use quill_shared::dto::{LoginForm, PasswordForm, SignupForm};

use crate::middleware::auth::{Identity, OptionalIdentity, cleared_session_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult, OrReject, Rejection};
use crate::middleware::form::{Submitted, submitted};
use crate::middleware::negotiate::ResponseMode;
use crate::state::AppState;
use crate::views::{present, respond, templates};

/// GET /
pub async fn index(identity: OptionalIdentity, mode: ResponseMode) -> HttpResponse {
    let OptionalIdentity(identity) = identity;
    if mode.is_json() {
        return HttpResponse::Ok().json(json!({
            "success": identity.is_some(),
            "user": identity.as_ref().map(|i| present::viewer(&i.user)),
        }));
    }

    match identity {
        Some(_) => respond::redirect("/blog"),
        None => respond::redirect("/login"),
    }
}

/// GET /login
pub async fn login_page(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let viewer = identity.0.as_ref().map(|i| &i.user);
    respond::page(&state, &req, mode, templates::LOGIN, viewer, &json!({}))
}

/// POST /login
pub async fn login(
    state: web::Data<AppState>,
    mode: ResponseMode,
    body: Submitted<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = submitted(body);
    let grant = state
        .auth
        .login(&form.email, &form.password)
        .await
        .or_back(mode, "/login")?;

    let cookie = session_cookie(&state.cookie, grant.token, grant.max_age_seconds);
    let mut response = respond::done(mode, "/blog", "Welcome back", present::viewer(&grant.user));
    response
        .add_cookie(&cookie)
        .map_err(|e| Rejection::new(AppError::Internal(e.to_string()), mode))?;
    Ok(response)
}

/// GET /signup
pub async fn signup_page(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let viewer = identity.0.as_ref().map(|i| &i.user);
    respond::page(&state, &req, mode, templates::SIGNUP, viewer, &json!({}))
}

/// POST /signup
pub async fn signup(
    state: web::Data<AppState>,
    mode: ResponseMode,
    body: Submitted<SignupForm>,
) -> AppResult<HttpResponse> {
    let form = submitted(body);
    let role = form
        .role
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::parse::<Role>)
        .transpose()
        .map_err(AppError::BadRequest)
        .or_back(mode, "/signup")?;

    let user = state
        .auth
        .signup(SignupInput {
            username: form.username,
            email: form.email,
            password: form.password,
            role,
        })
        .await
        .or_back(mode, "/signup")?;

    Ok(respond::done(
        mode,
        "/login",
        "Account created, please login",
        present::viewer(&user),
    ))
}

/// GET /logout
pub async fn logout(
    state: web::Data<AppState>,
    mode: ResponseMode,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    if let Some(identity) = identity.0 {
        state.auth.logout(&identity.token).await.or_page(mode)?;
    }
    ended_session(&state, mode, "Logged out")
}

/// GET /password
pub async fn password_page(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: Identity,
) -> AppResult<HttpResponse> {
    respond::page(
        &state,
        &req,
        mode,
        templates::PASSWORD,
        Some(&identity.user),
        &json!({}),
    )
}

/// POST /password
///
/// A changed password ends the current session.
pub async fn change_password(
    state: web::Data<AppState>,
    mode: ResponseMode,
    identity: Identity,
    body: Submitted<PasswordForm>,
) -> AppResult<HttpResponse> {
    let form = submitted(body);
    state
        .auth
        .change_password(
            identity.id(),
            &form.old_password,
            &form.new_password,
            &form.confirm_password,
        )
        .await
        .or_back(mode, "/password")?;

    state.auth.logout(&identity.token).await.or_page(mode)?;
    ended_session(&state, mode, "Password changed, please login again")
}

/// Send the client to `/login` with the session cookie cleared.
pub(super) fn ended_session(
    state: &AppState,
    mode: ResponseMode,
    message: &str,
) -> AppResult<HttpResponse> {
    let mut response = respond::done(mode, "/login", message, ());
    response
        .add_cookie(&cleared_session_cookie(&state.cookie))
        .map_err(|e| Rejection::new(AppError::Internal(e.to_string()), mode))?;
    Ok(response)
}
