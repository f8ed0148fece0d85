use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};
use tempfile::TempDir;

use quill_shared::dto::LoginForm;

use super::configure_routes;
use crate::observability::{REQUEST_ID_HEADER, RequestIdMiddleware};
use crate::state::AppState;
use crate::views::FLASH_COOKIE;

const SESSION_COOKIE: &str = "quill.sid";
const BOUNDARY: &str = "quill-test-boundary";

fn state() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    (AppState::in_memory(dir.path()), dir)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

/// Sign up and log in over JSON, yielding the session cookie.
macro_rules! session {
    ($app:expr, $username:expr) => {{
        let username: &str = $username;
        let email = format!("{username}@example.com");

        let req = test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({ "username": username, "email": email, "password": "hunter22" }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": email, "password": "hunter22" }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        resp.response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.into_owned())
            .unwrap()
    }};
}

/// Create a post over JSON and return its id.
macro_rules! create_post {
    ($app:expr, $cookie:expr, $title:expr, $category:expr) => {{
        let req = test::TestRequest::post()
            .uri("/posts")
            .cookie($cookie.clone())
            .set_json(json!({ "title": $title, "body": "Some words", "category": $category }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        body["data"]["id"].as_str().unwrap().to_string()
    }};
}

macro_rules! get_json {
    ($app:expr, $cookie:expr, $uri:expr) => {{
        let req = test::TestRequest::get()
            .uri($uri)
            .cookie($cookie.clone())
            .insert_header((header::ACCEPT, "application/json"))
            .to_request();
        test::call_service(&$app, req).await
    }};
}

fn multipart(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[actix_web::test]
async fn health_reports_ok_and_echoes_request_id() {
    let (state, _dir) = state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header((REQUEST_ID_HEADER, "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["request_id"], "abc-123");
}

#[actix_web::test]
async fn root_redirects_by_session() {
    let (state, _dir) = state();
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    let cookie = session!(app, "alice");
    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/blog");
}

#[actix_web::test]
async fn duplicate_signup_conflicts_and_keeps_first_account() {
    let (state, _dir) = state();
    let app = app!(state);
    let _ = session!(app, "alice");

    let req = test::TestRequest::post()
        .uri("/signup")
        .set_json(json!({ "username": "alice2", "email": "alice@example.com", "password": "other" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // original credentials still work
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "alice@example.com", "password": "hunter22" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn browser_wrong_password_redirects_back_with_flash() {
    let (state, _dir) = state();
    let app = app!(state);
    let _ = session!(app, "alice");

    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/login")
            .set_form(LoginForm {
                email: "alice@example.com".into(),
                password: "wrong".into(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/login");
        assert!(resp.response().cookies().any(|c| c.name() == FLASH_COOKIE));
    }

    // no lockout
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "alice@example.com", "password": "hunter22" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn protected_pages_require_a_session() {
    let (state, _dir) = state();
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/blog").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    let req = test::TestRequest::get()
        .uri("/blog")
        .insert_header((header::ACCEPT, "application/json"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[actix_web::test]
async fn blog_home_renders_for_browsers() {
    let (state, _dir) = state();
    let app = app!(state);
    let cookie = session!(app, "alice");
    create_post!(app, cookie, "Hello", "tech");

    let req = test::TestRequest::get().uri("/blog").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("page-context"));
    assert!(html.contains("Latest posts"));
}

#[actix_web::test]
async fn created_post_is_retrievable_with_its_author() {
    let (state, _dir) = state();
    let app = app!(state);
    let cookie = session!(app, "alice");
    let id = create_post!(app, cookie, "First trip", "travel");

    let resp = get_json!(app, cookie, &format!("/posts/{id}"));
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["title"], "First trip");
    assert_eq!(body["data"]["author_name"], "alice");
    assert_eq!(body["data"]["is_author"], true);
}

#[actix_web::test]
async fn missing_post_fields_redirect_back_to_the_form() {
    let (state, _dir) = state();
    let app = app!(state);
    let cookie = session!(app, "alice");

    let req = test::TestRequest::post()
        .uri("/posts")
        .cookie(cookie)
        .insert_header((
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        ))
        .set_payload("title=&body=x&category=tech")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/posts/new");
}

#[actix_web::test]
async fn non_author_cannot_change_a_post() {
    let (state, _dir) = state();
    let app = app!(state);
    let alice = session!(app, "alice");
    let bob = session!(app, "bob");
    let id = create_post!(app, alice, "Mine", "tech");

    let req = test::TestRequest::post()
        .uri(&format!("/posts/delete/{id}"))
        .cookie(bob.clone())
        .insert_header((header::ACCEPT, "application/json"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/edit/{id}"))
        .cookie(bob.clone())
        .set_json(json!({ "title": "Hijacked" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let resp = get_json!(app, alice, &format!("/posts/{id}"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["title"], "Mine");
}

#[actix_web::test]
async fn author_updates_then_deletes() {
    let (state, _dir) = state();
    let app = app!(state);
    let cookie = session!(app, "alice");
    let id = create_post!(app, cookie, "Draft", "tech");

    let req = test::TestRequest::post()
        .uri(&format!("/posts/edit/{id}"))
        .cookie(cookie.clone())
        .set_json(json!({ "title": "Final", "body": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["title"], "Final");
    assert_eq!(body["data"]["body"], "Some words");
    assert_eq!(body["location"], format!("/posts/{id}"));

    let req = test::TestRequest::post()
        .uri(&format!("/posts/delete/{id}"))
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/blog");

    let resp = get_json!(app, cookie, &format!("/posts/{id}"));
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn likes_toggle_per_user() {
    let (state, _dir) = state();
    let app = app!(state);
    let alice = session!(app, "alice");
    let bob = session!(app, "bob");
    let id = create_post!(app, alice, "Likeable", "tech");

    for (cookie, expected) in [(&alice, "liked"), (&bob, "liked"), (&alice, "unliked")] {
        let req = test::TestRequest::post()
            .uri(&format!("/posts/{id}/like"))
            .cookie(cookie.clone())
            .insert_header((header::ACCEPT, "application/json"))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["status"], expected);
    }

    let resp = get_json!(app, bob, &format!("/posts/{id}"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["like_count"], 1);
    assert_eq!(body["data"]["liked_by_viewer"], true);
}

#[actix_web::test]
async fn blank_comment_is_ignored() {
    let (state, _dir) = state();
    let app = app!(state);
    let cookie = session!(app, "alice");
    let id = create_post!(app, cookie, "Quiet", "tech");

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{id}/comments"))
        .cookie(cookie.clone())
        .set_form([("body", "   ")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), format!("/posts/{id}"));
    assert!(!resp.response().cookies().any(|c| c.name() == FLASH_COOKIE));

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{id}/comments"))
        .cookie(cookie.clone())
        .set_json(json!({ "body": " Nice post " }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let resp = get_json!(app, cookie, &format!("/posts/{id}"));
    let body: Value = test::read_body_json(resp).await;
    let comments = body["data"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["body"], "Nice post");
    assert_eq!(comments[0]["author_name"], "alice");
}

#[actix_web::test]
async fn category_pages_filter_and_reject_unknown_names() {
    let (state, _dir) = state();
    let app = app!(state);
    let cookie = session!(app, "alice");
    create_post!(app, cookie, "Paris", "travel");
    create_post!(app, cookie, "Rust", "tech");
    create_post!(app, cookie, "Rome", "travel");

    let resp = get_json!(app, cookie, "/category/travel");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let titles: Vec<&str> = body["data"]["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Rome", "Paris"]);

    let resp = get_json!(app, cookie, "/category/cooking");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn search_matches_title_or_body() {
    let (state, _dir) = state();
    let app = app!(state);
    let cookie = session!(app, "alice");
    create_post!(app, cookie, "Learning RUST", "tech");
    create_post!(app, cookie, "Beaches", "travel");

    let resp = get_json!(app, cookie, "/posts/search?q=rust");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["posts"].as_array().unwrap().len(), 1);

    let resp = get_json!(app, cookie, "/posts/search?q=%20%20");
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["posts"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn cover_upload_is_served_and_removed_with_the_post() {
    let (state, _dir) = state();
    let app = app!(state);
    let cookie = session!(app, "alice");

    let req = test::TestRequest::post()
        .uri("/posts")
        .cookie(cookie.clone())
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .insert_header((header::ACCEPT, "application/json"))
        .set_payload(multipart(
            &[("title", "Sunset"), ("body", "Orange"), ("category", "travel")],
            Some(("cover", "sunset.png", b"\x89PNG fake")),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let cover_url = body["data"]["cover_url"].as_str().unwrap().to_string();
    assert!(cover_url.starts_with("/uploads/") && cover_url.ends_with(".png"));

    let resp = test::call_service(&app, test::TestRequest::get().uri(&cover_url).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
    assert_eq!(
        resp.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
        "nosniff"
    );

    let req = test::TestRequest::post()
        .uri(&format!("/posts/delete/{id}"))
        .cookie(cookie)
        .insert_header((header::ACCEPT, "application/json"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let resp = test::call_service(&app, test::TestRequest::get().uri(&cover_url).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn oversized_upload_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = AppState::in_memory(dir.path());
    state.upload_max_bytes = 16;
    let app = app!(state);
    let cookie = session!(app, "alice");

    let req = test::TestRequest::post()
        .uri("/profile/avatar")
        .cookie(cookie)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .insert_header((header::ACCEPT, "application/json"))
        .set_payload(multipart(&[], Some(("avatar", "me.jpg", &[0u8; 64]))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[actix_web::test]
async fn upload_limit_covers_the_whole_form() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = AppState::in_memory(dir.path());
    state.upload_max_bytes = 48;
    let app = app!(state);
    let cookie = session!(app, "alice");

    let title = "t".repeat(30);
    let body = "b".repeat(30);
    let req = test::TestRequest::post()
        .uri("/posts")
        .cookie(cookie)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .insert_header((header::ACCEPT, "application/json"))
        .set_payload(multipart(
            &[("title", title.as_str()), ("body", body.as_str()), ("category", "travel")],
            None,
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[actix_web::test]
async fn non_image_cover_is_refused() {
    let (state, dir) = state();
    let app = app!(state);
    let cookie = session!(app, "alice");

    let req = test::TestRequest::post()
        .uri("/posts")
        .cookie(cookie.clone())
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .insert_header((header::ACCEPT, "application/json"))
        .set_payload(multipart(
            &[("title", "Sunset"), ("body", "Orange"), ("category", "travel")],
            Some(("cover", "evil.html", b"<script>alert(1)</script>")),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    let resp = get_json!(app, cookie, "/posts/search?q=Sunset");
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["posts"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn uploads_reject_traversal() {
    let (state, _dir) = state();
    let app = app!(state);

    for uri in ["/uploads/..%2Fsecret", "/uploads/.env", "/uploads/nothing.png"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn profile_edit_keeps_blank_fields() {
    let (state, _dir) = state();
    let app = app!(state);
    let cookie = session!(app, "alice");

    let req = test::TestRequest::post()
        .uri("/profile/edit")
        .cookie(cookie.clone())
        .set_json(json!({ "fullName": "Alice Liddell", "birthdate": "1990-05-04", "mobile": "" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let resp = get_json!(app, cookie, "/profile");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["full_name"], "Alice Liddell");
    assert_eq!(body["data"]["birthdate"], "1990-05-04");
    assert!(body["data"]["mobile"].is_null());

    let req = test::TestRequest::post()
        .uri("/profile/edit")
        .cookie(cookie)
        .set_json(json!({ "birthdate": "04/05/1990" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let (state, _dir) = state();
    let app = app!(state);
    let cookie = session!(app, "alice");

    let req = test::TestRequest::get().uri("/logout").cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .unwrap();
    assert_eq!(cleared.value(), "");

    let resp = get_json!(app, cookie, "/blog");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn password_change_requires_old_password_and_ends_session() {
    let (state, _dir) = state();
    let app = app!(state);
    let cookie = session!(app, "alice");

    let req = test::TestRequest::post()
        .uri("/password")
        .cookie(cookie.clone())
        .set_json(json!({ "oldPassword": "nope", "newPassword": "a", "confirmPassword": "a" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/password")
        .cookie(cookie.clone())
        .set_json(json!({ "oldPassword": "hunter22", "newPassword": "a", "confirmPassword": "b" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/password")
        .cookie(cookie.clone())
        .set_json(json!({ "oldPassword": "hunter22", "newPassword": "swordfish", "confirmPassword": "swordfish" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert_eq!(get_json!(app, cookie, "/blog").status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "alice@example.com", "password": "swordfish" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn deleted_account_keeps_posts_as_anonymous() {
    let (state, _dir) = state();
    let app = app!(state);
    let alice = session!(app, "alice");
    let bob = session!(app, "bob");
    let id = create_post!(app, alice, "Legacy", "tech");

    let req = test::TestRequest::post()
        .uri("/profile/delete")
        .cookie(alice.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/login");

    assert_eq!(get_json!(app, alice, "/profile").status(), StatusCode::UNAUTHORIZED);

    let resp = get_json!(app, bob, &format!("/posts/{id}"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["author_name"], "Anonymous");
}

#[actix_web::test]
async fn admins_are_kept_off_post_pages() {
    let (state, _dir) = state();
    let app = app!(state);
    let alice = session!(app, "alice");
    let id = create_post!(app, alice, "Members only", "tech");

    let req = test::TestRequest::post()
        .uri("/signup")
        .set_json(json!({ "username": "root", "email": "root@example.com", "password": "pw", "role": "admin" }))
        .to_request();
    test::call_service(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": "root@example.com", "password": "pw" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let admin: Cookie<'static> = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
        .unwrap();

    let resp = get_json!(app, admin, &format!("/posts/{id}"));
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{id}"))
        .cookie(admin)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/login");
}
