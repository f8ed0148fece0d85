//! Locally stored uploads.

use actix_web::http::header::{self, CacheControl, CacheDirective};
use actix_web::{HttpResponse, web};

use quill_core::ports::StorageError;

use crate::middleware::error::{AppError, AppResult, OrReject};
use crate::middleware::negotiate::ResponseMode;
use crate::state::AppState;

/// GET /uploads/{filename}
pub async fn serve(
    state: web::Data<AppState>,
    mode: ResponseMode,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let filename = path.into_inner();
    let bytes = match state.files.read(&filename).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) | Err(StorageError::InvalidFilename(_)) => {
            return Err(AppError::NotFound("File not found".to_string())).or_page(mode);
        }
        Err(e) => return Err(AppError::Internal(e.to_string())).or_page(mode),
    };

    let content_type = mime_guess::from_path(&filename).first_or_octet_stream();
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type.essence_str()))
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .insert_header(CacheControl(vec![
            CacheDirective::Public,
            CacheDirective::MaxAge(86_400),
        ]))
        .body(bytes))
}
