//! Listing pages.

use actix_web::{HttpRequest, HttpResponse, web};

use quill_core::domain::{Category, FeedScope};

use super::parse_id;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult, OrReject};
use crate::middleware::negotiate::ResponseMode;
use crate::state::AppState;
use crate::views::{present, respond, templates};

/// GET /blog
pub async fn blog(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let page = state.feeds.page(FeedScope::All).await.or_page(mode)?;
    respond::page(
        &state,
        &req,
        mode,
        templates::BLOG_HOME,
        Some(&identity.user),
        &present::feed(&page),
    )
}

/// GET /category/{category}
pub async fn category(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let category = path
        .parse::<Category>()
        .map_err(|_| AppError::NotFound("Category not found".to_string()))
        .or_page(mode)?;

    let page = state
        .feeds
        .page(FeedScope::Category(category))
        .await
        .or_page(mode)?;
    respond::page(
        &state,
        &req,
        mode,
        templates::CATEGORY,
        identity.0.as_ref().map(|i| &i.user),
        &present::feed(&page),
    )
}

/// GET /author/{id}
pub async fn author(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author_id = parse_id(&path, "Author").or_page(mode)?;
    let page = state
        .feeds
        .page(FeedScope::Author(author_id))
        .await
        .or_page(mode)?;
    respond::page(
        &state,
        &req,
        mode,
        templates::AUTHOR,
        identity.0.as_ref().map(|i| &i.user),
        &present::feed(&page),
    )
}

/// GET /write - the caller's own posts.
pub async fn writer(
    state: web::Data<AppState>,
    req: HttpRequest,
    mode: ResponseMode,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let posts = state
        .feeds
        .writer_posts(identity.id())
        .await
        .or_page(mode)?;
    respond::page(
        &state,
        &req,
        mode,
        templates::WRITER_HOME,
        Some(&identity.user),
        &present::writer(&identity.user, &posts),
    )
}
