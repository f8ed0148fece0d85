//! Response negotiation: browser pages or JSON, decided once per request.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};

/// How a handler should answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Rendered pages, redirects and flash notices.
    Html,
    /// JSON envelopes and RFC 7807 problem documents.
    Json,
}

impl ResponseMode {
    /// JSON when the client sends JSON or asks for it without also accepting HTML.
    pub fn detect(req: &HttpRequest) -> Self {
        let sends_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let wants_json = req
            .headers()
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|accept| {
                accept.contains("application/json") && !accept.contains("text/html")
            });

        if sends_json || wants_json {
            ResponseMode::Json
        } else {
            ResponseMode::Html
        }
    }

    pub fn is_json(self) -> bool {
        self == ResponseMode::Json
    }
}

impl FromRequest for ResponseMode {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(ResponseMode::detect(req)))
    }
}
