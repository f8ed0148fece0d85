//! One-shot notices carried across a redirect in a short-lived cookie.

use actix_web::HttpRequest;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use serde::Serialize;

pub const FLASH_COOKIE: &str = "quill_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Read the notice left by the previous response, if any.
    pub fn from_request(req: &HttpRequest) -> Option<Self> {
        let cookie = req.cookie(FLASH_COOKIE)?;
        Self::decode(cookie.value())
    }

    pub fn cookie(&self) -> Cookie<'static> {
        Cookie::build(FLASH_COOKIE, self.encode())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(Duration::seconds(60))
            .finish()
    }

    /// Cookie that clears a consumed notice.
    pub fn removal() -> Cookie<'static> {
        let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
        cookie.make_removal();
        cookie
    }

    fn encode(&self) -> String {
        let kind = match self.kind {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        };
        // Characters that would end the cookie value are dropped
        let message: String = self
            .message
            .chars()
            .filter(|c| !c.is_control() && !matches!(c, ';' | ',' | '"' | '\\'))
            .collect();
        format!("{kind}:{message}")
    }

    fn decode(value: &str) -> Option<Self> {
        let (kind, message) = value.split_once(':')?;
        let kind = match kind {
            "success" => FlashKind::Success,
            "error" => FlashKind::Error,
            _ => return None,
        };
        Some(Self {
            kind,
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode() {
        let flash = Flash::error("Invalid password; try again");
        let decoded = Flash::decode(&flash.encode()).unwrap();
        assert_eq!(decoded.kind, FlashKind::Error);
        assert_eq!(decoded.message, "Invalid password try again");
    }

    #[test]
    fn garbage_is_ignored() {
        assert_eq!(Flash::decode("nonsense"), None);
        assert_eq!(Flash::decode("warning:hi"), None);
    }
}
