//! Page rendering. Templates are an outer collaborator: handlers hand a
//! template name and a JSON context to a [`ViewRenderer`].

mod flash;
pub mod present;
pub mod respond;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;

pub use flash::{FLASH_COOKIE, Flash, FlashKind};

/// Template names.
pub mod templates {
    pub const LOGIN: &str = "auth/login";
    pub const SIGNUP: &str = "auth/signup";
    pub const PASSWORD: &str = "auth/password";
    pub const BLOG_HOME: &str = "blog/home";
    pub const CATEGORY: &str = "blog/category";
    pub const AUTHOR: &str = "blog/author";
    pub const POST: &str = "blog/post";
    pub const POST_FORM: &str = "blog/post_form";
    pub const SEARCH: &str = "blog/search";
    pub const WRITER_HOME: &str = "writer/home";
    pub const PROFILE: &str = "user/profile";
    pub const PROFILE_EDIT: &str = "user/edit";
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Context serialization failed: {0}")]
    Context(#[from] serde_json::Error),
}

/// Turns a template name and its context into an HTML document.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, RenderError>;
}

/// Emits a minimal document embedding the page context as JSON, for a
/// client-side template layer to pick up.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRenderer;

impl ViewRenderer for ShellRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, RenderError> {
        if template.is_empty() || !template.chars().all(|c| c.is_ascii_alphanumeric() || c == '/' || c == '_') {
            return Err(RenderError::UnknownTemplate(template.to_string()));
        }

        let json = serde_json::to_string(context)?
            .replace('<', "\\u003c")
            .replace('>', "\\u003e")
            .replace('&', "\\u0026");

        Ok(format!(
            "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Quill</title></head>\n\
             <body data-template=\"{template}\">\n<main id=\"app\"></main>\n\
             <script type=\"application/json\" id=\"page-context\">{json}</script>\n</body>\n</html>\n"
        ))
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Bare error page for browsers.
pub fn status_page(status: StatusCode, message: &str) -> HttpResponse {
    let title = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(format!(
            "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
             <body><h1>{title}</h1><p>{}</p><p><a href=\"/blog\">Back to the blog</a></p></body>\n</html>\n",
            escape_html(message)
        ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn shell_embeds_context_safely() {
        let html = ShellRenderer
            .render(templates::POST, &json!({"title": "</script><b>x</b>"}))
            .unwrap();
        assert!(html.contains("data-template=\"blog/post\""));
        assert!(!html.contains("</script><b>"));
        assert!(html.contains("\\u003c/script\\u003e"));
    }

    #[test]
    fn odd_template_names_are_rejected() {
        assert!(ShellRenderer.render("../etc", &json!({})).is_err());
        assert!(ShellRenderer.render("", &json!({})).is_err());
    }

    #[test]
    fn status_page_escapes_message() {
        let response = status_page(StatusCode::NOT_FOUND, "<b>gone</b>");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
