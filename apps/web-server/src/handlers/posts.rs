//! Post lifecycle: search, create, show, edit, delete.

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use quill_core::domain::{Post, Role};
use quill_core::services::{Authors, PostDetail, PostInput};
use quill_shared::dto::SearchQuery;

use super::parse_id;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult, OrReject, Rejection};
use crate::middleware::form::FormData;
use crate::middleware::negotiate::ResponseMode;
use crate::state::AppState;
use crate::views::{present, respond, templates};

/// Multipart field carrying the cover image.
const COVER_FIELD: &str = "cover";

fn post_input(form: &FormData) -> PostInput {
    PostInput {
        title: form.text("title"),
        body: form.text("body"),
        category: form.text("category"),
    }
}

/// Detail view of a post the caller just wrote.
fn own_post(post: Post, identity: &Identity) -> PostDetail {
    PostDetail {
        post,
        authors: Authors::from_users([&identity.user]),
    }
}

/// GET /posts/search?q=
pub async fn search(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: Identity,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let results = state.posts.search(&query.q).await.or_page(mode)?;
    respond::page(
        &state,
        &req,
        mode,
        templates::SEARCH,
        Some(&identity.user),
        &present::search(&query.q, &results),
    )
}

/// GET /posts/new
pub async fn new_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: Identity,
) -> AppResult<HttpResponse> {
    respond::page(
        &state,
        &req,
        mode,
        templates::POST_FORM,
        Some(&identity.user),
        &present::post_form(None),
    )
}

/// POST /posts
pub async fn create(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: Identity,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    let form = FormData::read(&req, payload, COVER_FIELD, state.upload_max_bytes)
        .await
        .or_back(mode, "/posts/new")?;
    let input = post_input(&form);

    let post = state
        .posts
        .create(identity.id(), input, form.file)
        .await
        .or_back(mode, "/posts/new")?;

    let view = present::post(&own_post(post, &identity), Some(identity.id()));
    Ok(respond::done(mode, "/blog", "Post created", view))
}

/// GET /posts/{id}
pub async fn show(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    if !identity.has_role(Role::User) {
        tracing::debug!(user_id = %identity.id(), role = %identity.user.role, "Post view refused");
        let error = match mode {
            ResponseMode::Json => AppError::Forbidden,
            ResponseMode::Html => AppError::Unauthorized,
        };
        return Err(Rejection::new(error, mode));
    }

    let post_id = parse_id(&path, "Post").or_page(mode)?;
    let detail = state.posts.show(post_id).await.or_page(mode)?;
    respond::page(
        &state,
        &req,
        mode,
        templates::POST,
        Some(&identity.user),
        &present::post(&detail, Some(identity.id())),
    )
}

/// GET /posts/edit/{id}
pub async fn edit_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path, "Post").or_page(mode)?;
    let post = state
        .posts
        .editable(post_id, identity.id())
        .await
        .or_page(mode)?;

    let view = present::post(&own_post(post, &identity), Some(identity.id()));
    respond::page(
        &state,
        &req,
        mode,
        templates::POST_FORM,
        Some(&identity.user),
        &present::post_form(Some(view)),
    )
}

/// POST /posts/edit/{id}
pub async fn update(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: Identity,
    path: web::Path<String>,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path, "Post").or_page(mode)?;
    let back = format!("/posts/edit/{post_id}");

    let form = FormData::read(&req, payload, COVER_FIELD, state.upload_max_bytes)
        .await
        .or_back(mode, &back)?;
    let input = post_input(&form);

    let post = state
        .posts
        .update(post_id, identity.id(), input, form.file)
        .await
        .or_back(mode, &back)?;

    let view = present::post(&own_post(post, &identity), Some(identity.id()));
    Ok(respond::done(
        mode,
        &format!("/posts/{post_id}"),
        "Post updated",
        view,
    ))
}

/// POST /posts/delete/{id}
pub async fn delete(
    state: web::Data<AppState>,
    mode: ResponseMode,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path, "Post").or_page(mode)?;
    state
        .posts
        .delete(post_id, identity.id())
        .await
        .or_back(mode, "/blog")?;

    Ok(respond::done(
        mode,
        "/blog",
        "Post deleted",
        json!({ "id": post_id }),
    ))
}
