//! Success responses, shaped by the negotiated [`ResponseMode`].

use actix_web::http::header;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use serde_json::json;

use quill_core::domain::User;
use quill_shared::ApiResponse;

use super::{Flash, present};
use crate::middleware::error::{AppError, AppResult, Rejection};
use crate::middleware::negotiate::ResponseMode;
use crate::state::AppState;

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn redirect_with(location: &str, flash: Flash) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(flash.cookie())
        .finish()
}

/// A completed mutation: browsers follow `location` with a success notice,
/// JSON clients get the envelope.
pub fn done<T: Serialize>(mode: ResponseMode, location: &str, message: &str, data: T) -> HttpResponse {
    match mode {
        ResponseMode::Json => HttpResponse::Ok()
            .json(ApiResponse::ok_with_message(data, message).with_location(location)),
        ResponseMode::Html => redirect_with(location, Flash::success(message)),
    }
}

/// Render a page for browsers, or hand JSON clients the page data.
pub fn page<T: Serialize>(
    state: &AppState,
    req: &HttpRequest,
    mode: ResponseMode,
    template: &str,
    viewer: Option<&User>,
    data: &T,
) -> AppResult<HttpResponse> {
    if mode.is_json() {
        return Ok(HttpResponse::Ok().json(ApiResponse::ok(data)));
    }

    let flash = Flash::from_request(req);
    let context = json!({
        "viewer": viewer.map(present::viewer),
        "flash": flash,
        "page": data,
    });

    let html = state
        .renderer
        .render(template, &context)
        .map_err(|e| Rejection::new(AppError::Internal(e.to_string()), mode))?;

    let mut response = HttpResponse::Ok();
    response.content_type(ContentType::html());
    if flash.is_some() {
        response.cookie(Flash::removal());
    }
    Ok(response.body(html))
}
