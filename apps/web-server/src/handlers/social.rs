//! Likes and comments.

use actix_web::{HttpResponse, web};
use serde_json::json;

use quill_core::domain::LikeToggle;
use quill_shared::ApiResponse;
use quill_shared::dto::{CommentForm, CommentView};

use super::parse_id;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppResult, OrReject};
use crate::middleware::form::{Submitted, submitted};
use crate::middleware::negotiate::ResponseMode;
use crate::state::AppState;
use crate::views::respond;

/// POST /posts/{id}/like
pub async fn like(
    state: web::Data<AppState>,
    mode: ResponseMode,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path, "Post").or_page(mode)?;
    let outcome = state
        .posts
        .toggle_like(post_id, identity.id())
        .await
        .or_back(mode, "/blog")?;

    let message = match outcome {
        LikeToggle::Liked => "Post liked",
        LikeToggle::Unliked => "Like removed",
    };
    Ok(respond::done(
        mode,
        &format!("/posts/{post_id}"),
        message,
        json!({ "id": post_id, "status": outcome }),
    ))
}

/// POST /posts/{id}/comments
///
/// A blank comment sends the client back without touching the post.
pub async fn comment(
    state: web::Data<AppState>,
    mode: ResponseMode,
    identity: Identity,
    path: web::Path<String>,
    body: Submitted<CommentForm>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path, "Post").or_page(mode)?;
    let location = format!("/posts/{post_id}");
    let form = submitted(body);

    let added = state
        .posts
        .add_comment(post_id, identity.id(), &form.body)
        .await
        .or_back(mode, "/blog")?;

    match added {
        Some(comment) => Ok(respond::done(
            mode,
            &location,
            "Comment added",
            CommentView {
                id: comment.id.to_string(),
                author_id: comment.author_id.to_string(),
                author_name: identity.user.username.clone(),
                body: comment.body,
                created_at: comment.created_at,
            },
        )),
        None if mode.is_json() => Ok(HttpResponse::Ok().json(
            ApiResponse::ok_with_message(json!({ "id": post_id }), "Empty comment ignored")
                .with_location(location),
        )),
        None => Ok(respond::redirect(&location)),
    }
}
