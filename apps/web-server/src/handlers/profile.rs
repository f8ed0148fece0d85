//! The caller's own profile.

use actix_web::{HttpRequest, HttpResponse, web};

use quill_core::services::ProfileInput;
use quill_shared::dto::ProfileForm;

use super::auth::ended_session;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppResult, OrReject};
use crate::middleware::form::{FormData, Submitted, submitted};
use crate::middleware::negotiate::ResponseMode;
use crate::state::AppState;
use crate::views::{present, respond, templates};

/// Multipart field carrying the avatar image.
const AVATAR_FIELD: &str = "avatar";

/// GET /profile
pub async fn show(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let user = state.profiles.profile(identity.id()).await.or_page(mode)?;
    respond::page(
        &state,
        &req,
        mode,
        templates::PROFILE,
        Some(&user),
        &present::profile(&user),
    )
}

/// GET /profile/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let user = state.profiles.profile(identity.id()).await.or_page(mode)?;
    respond::page(
        &state,
        &req,
        mode,
        templates::PROFILE_EDIT,
        Some(&user),
        &present::profile(&user),
    )
}

/// POST /profile/edit
pub async fn update(
    state: web::Data<AppState>,
    mode: ResponseMode,
    identity: Identity,
    body: Submitted<ProfileForm>,
) -> AppResult<HttpResponse> {
    let form = submitted(body);
    let user = state
        .profiles
        .update_profile(
            identity.id(),
            ProfileInput {
                full_name: form.full_name,
                mobile: form.mobile,
                address: form.address,
                birthdate: form.birthdate,
                gender: form.gender,
            },
        )
        .await
        .or_back(mode, "/profile/edit")?;

    Ok(respond::done(
        mode,
        "/profile",
        "Profile updated",
        present::profile(&user),
    ))
}

/// POST /profile/avatar
pub async fn avatar(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: Identity,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    let form = FormData::read(&req, payload, AVATAR_FIELD, state.upload_max_bytes)
        .await
        .or_back(mode, "/profile")?;

    let user = state
        .profiles
        .update_avatar(identity.id(), form.file)
        .await
        .or_back(mode, "/profile")?;

    Ok(respond::done(
        mode,
        "/profile",
        "Avatar updated",
        present::profile(&user),
    ))
}

/// POST /profile/delete
pub async fn delete(
    state: web::Data<AppState>,
    mode: ResponseMode,
    identity: Identity,
) -> AppResult<HttpResponse> {
    state
        .profiles
        .delete_account(identity.id())
        .await
        .or_back(mode, "/profile")?;
    state.auth.logout(&identity.token).await.or_page(mode)?;

    ended_session(&state, mode, "Account deleted")
}
