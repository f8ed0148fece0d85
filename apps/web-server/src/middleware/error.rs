//! Error handling - RFC 7807 documents for JSON clients, redirects with a
//! flash notice or status pages for browsers.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_core::DomainError;
use quill_shared::ErrorResponse;

use super::negotiate::ResponseMode;
use crate::views::{Flash, respond, status_page};

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    InvalidCredentials,
    Forbidden,
    Conflict(String),
    BadGateway(String),
    PayloadTooLarge(usize),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::BadGateway(msg) => write!(f, "Media host failure: {}", msg),
            AppError::PayloadTooLarge(limit) => write!(f, "Upload larger than {} bytes", limit),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    /// Short notice shown to a browser user.
    pub fn notice(&self) -> String {
        match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            AppError::Unauthorized => "Please login first".to_string(),
            AppError::InvalidCredentials => "Invalid password".to_string(),
            AppError::Forbidden => "You can only change your own posts".to_string(),
            AppError::BadGateway(_) => "Image upload failed, please try again".to_string(),
            AppError::PayloadTooLarge(limit) => {
                format!("File exceeds maximum size of {} bytes", limit)
            }
            AppError::Internal(_) => "Something went wrong".to_string(),
        }
    }

    fn problem(&self) -> ErrorResponse {
        match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::InvalidCredentials => ErrorResponse::invalid_credentials(),
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::BadGateway(_) => ErrorResponse::bad_gateway(),
            AppError::PayloadTooLarge(_) => {
                ErrorResponse::new(413, "Payload Too Large").with_detail(self.notice())
            }
            AppError::Internal(_) => ErrorResponse::internal_error(),
        }
    }

    fn log(&self) {
        match self {
            AppError::Internal(detail) => tracing::error!("Internal error: {}", detail),
            AppError::BadGateway(detail) => tracing::warn!("Media host failure: {}", detail),
            _ => {}
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.log();
        HttpResponse::build(self.status_code()).json(self.problem())
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                tracing::debug!(entity_type, id = %id, "Lookup missed");
                let mut chars = entity_type.chars();
                let entity = chars
                    .next()
                    .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                    .unwrap_or_default();
                AppError::NotFound(format!("{} not found", entity))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::AlreadyExists(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized => AppError::Unauthorized,
            DomainError::InvalidCredentials => AppError::InvalidCredentials,
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::UpstreamMedia(msg) => AppError::BadGateway(msg),
            DomainError::Persistence(msg) | DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// An error bound to how the client wants to be answered.
///
/// Browsers are sent back to `back` with a flash notice when there is one;
/// otherwise they get a status page. Unauthenticated browsers go to `/login`.
#[derive(Debug)]
pub struct Rejection {
    error: AppError,
    mode: ResponseMode,
    back: Option<String>,
}

impl Rejection {
    pub fn new(error: impl Into<AppError>, mode: ResponseMode) -> Self {
        Self {
            error: error.into(),
            mode,
            back: None,
        }
    }

    pub fn back(mut self, location: impl Into<String>) -> Self {
        self.back = Some(location.into());
        self
    }

    pub fn error(&self) -> &AppError {
        &self.error
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl ResponseError for Rejection {
    fn status_code(&self) -> StatusCode {
        match (self.mode, &self.error, &self.back) {
            (ResponseMode::Json, error, _) => error.status_code(),
            (_, AppError::Unauthorized, _) => StatusCode::SEE_OTHER,
            (_, AppError::Forbidden | AppError::Internal(_), _) => self.error.status_code(),
            (_, _, Some(_)) => StatusCode::SEE_OTHER,
            (_, error, None) => error.status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.mode.is_json() {
            return self.error.error_response();
        }

        self.error.log();
        let status = self.status_code();
        if status != StatusCode::SEE_OTHER {
            return status_page(status, &self.error.notice());
        }

        let location = match (&self.error, &self.back) {
            (AppError::Unauthorized, _) => "/login",
            (_, Some(back)) => back.as_str(),
            (_, None) => "/",
        };
        respond::redirect_with(location, Flash::error(self.error.notice()))
    }
}

/// Bind a failure to the response mode at the call site.
pub trait OrReject<T> {
    /// Browsers go back to `location` with the error as a notice.
    fn or_back(self, mode: ResponseMode, location: &str) -> Result<T, Rejection>;

    /// Browsers get a status page.
    fn or_page(self, mode: ResponseMode) -> Result<T, Rejection>;
}

impl<T, E> OrReject<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn or_back(self, mode: ResponseMode, location: &str) -> Result<T, Rejection> {
        self.map_err(|e| Rejection::new(e, mode).back(location))
    }

    fn or_page(self, mode: ResponseMode) -> Result<T, Rejection> {
        self.map_err(|e| Rejection::new(e, mode))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, Rejection>;

#[cfg(test)]
mod tests {
    use actix_web::http::header;

    use super::*;

    #[test]
    fn browser_validation_error_redirects_back_with_notice() {
        let rejection = Rejection::new(AppError::BadRequest("title is required".into()), ResponseMode::Html)
            .back("/posts/new");
        let response = rejection.error_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/posts/new"
        );
        assert!(response.cookies().any(|c| c.name() == crate::views::FLASH_COOKIE));
    }

    #[test]
    fn browser_unauthorized_goes_to_login() {
        let response = Rejection::new(AppError::Unauthorized, ResponseMode::Html).error_response();
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[test]
    fn browser_forbidden_is_a_status_page() {
        let response = Rejection::new(AppError::Forbidden, ResponseMode::Html)
            .back("/blog")
            .error_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn json_clients_get_problem_documents() {
        let rejection = Rejection::new(DomainError::AlreadyExists("User already exists".into()), ResponseMode::Json)
            .back("/signup");
        assert_eq!(rejection.status_code(), StatusCode::CONFLICT);

        let rejection = Rejection::new(DomainError::UpstreamMedia("timeout".into()), ResponseMode::Json);
        assert_eq!(rejection.status_code(), StatusCode::BAD_GATEWAY);
    }
}
