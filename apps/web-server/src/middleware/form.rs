//! Form bodies that may carry one uploaded file.
//!
//! Browsers post `multipart/form-data`; JSON and urlencoded bodies are
//! accepted too and simply carry no file.

use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, http::header, web};
use futures::StreamExt;

use quill_core::services::Upload;

use super::error::AppError;

/// A text-only form, posted either as JSON or urlencoded.
pub type Submitted<T> = web::Either<web::Json<T>, web::Form<T>>;

pub fn submitted<T>(body: Submitted<T>) -> T {
    match body {
        web::Either::Left(json) => json.into_inner(),
        web::Either::Right(form) => form.into_inner(),
    }
}

/// Text fields plus the optional file.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    pub file: Option<Upload>,
}

impl FormData {
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// Read the request body, keeping the file posted under `file_field`.
    pub async fn read(
        req: &HttpRequest,
        payload: web::Payload,
        file_field: &str,
        max_bytes: usize,
    ) -> Result<Self, AppError> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            read_multipart(Multipart::new(req.headers(), payload), file_field, max_bytes).await
        } else {
            let body = read_body(payload, max_bytes).await?;
            let fields = if content_type.starts_with("application/json") {
                json_fields(&body)?
            } else {
                urlencoded_fields(&body)?
            };
            Ok(Self { fields, file: None })
        }
    }
}

async fn read_multipart(
    mut multipart: Multipart,
    file_field: &str,
    max_bytes: usize,
) -> Result<FormData, AppError> {
    let mut form = FormData::default();
    // Counted across every part, not per field.
    let mut received = 0usize;

    while let Some(item) = multipart.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?;
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::BadRequest(format!("Upload read error: {e}")))?;
            received += chunk.len();
            if received > max_bytes {
                return Err(AppError::PayloadTooLarge(max_bytes));
            }
            bytes.extend_from_slice(&chunk);
        }

        match filename {
            Some(filename) if name == file_field => {
                // Browsers send an empty part when no file was chosen
                if !filename.is_empty() && !bytes.is_empty() {
                    form.file = Some(Upload { filename, bytes });
                }
            }
            Some(_) => {
                tracing::debug!(field = %name, "Ignoring unexpected file field");
            }
            None => {
                let value = String::from_utf8(bytes)
                    .map_err(|_| AppError::BadRequest(format!("Field '{name}' is not UTF-8")))?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

async fn read_body(mut payload: web::Payload, max_bytes: usize) -> Result<Vec<u8>, AppError> {
    let mut body = Vec::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(format!("Body read error: {e}")))?;
        if body.len() + chunk.len() > max_bytes {
            return Err(AppError::PayloadTooLarge(max_bytes));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn json_fields(body: &[u8]) -> Result<HashMap<String, String>, AppError> {
    if body.is_empty() {
        return Ok(HashMap::new());
    }
    let object: HashMap<String, serde_json::Value> = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;

    Ok(object
        .into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::String(s) => Some((key, s)),
            serde_json::Value::Null => None,
            other => Some((key, other.to_string())),
        })
        .collect())
}

fn urlencoded_fields(body: &[u8]) -> Result<HashMap<String, String>, AppError> {
    let body = std::str::from_utf8(body)
        .map_err(|_| AppError::BadRequest("Form body is not UTF-8".to_string()))?;
    web::Query::<HashMap<String, String>>::from_query(body)
        .map(web::Query::into_inner)
        .map_err(|e| AppError::BadRequest(format!("Invalid form body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencoded_bodies_decode() {
        let fields = urlencoded_fields(b"title=Hello+world&category=travel").unwrap();
        assert_eq!(fields["title"], "Hello world");
        assert_eq!(fields["category"], "travel");
    }

    #[test]
    fn json_bodies_flatten_to_strings() {
        let fields = json_fields(br#"{"title":"Hi","likes":3,"cover":null}"#).unwrap();
        assert_eq!(fields["title"], "Hi");
        assert_eq!(fields["likes"], "3");
        assert!(!fields.contains_key("cover"));
    }

    #[test]
    fn bad_json_is_a_bad_request() {
        assert!(matches!(json_fields(b"{"), Err(AppError::BadRequest(_))));
    }
}
