//! HTTP handlers and route configuration.

mod auth;
mod feed;
mod health;
mod posts;
mod profile;
mod social;
mod uploads;

#[cfg(test)]
mod tests;

use actix_web::web;
use uuid::Uuid;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/health", web::get().to(health::health_check))
        .route("/", web::get().to(auth::index))
        .service(
            web::resource("/login")
                .route(web::get().to(auth::login_page))
                .route(web::post().to(auth::login)),
        )
        .service(
            web::resource("/signup")
                .route(web::get().to(auth::signup_page))
                .route(web::post().to(auth::signup)),
        )
        .route("/logout", web::get().to(auth::logout))
        .service(
            web::resource("/password")
                .route(web::get().to(auth::password_page))
                .route(web::post().to(auth::change_password)),
        )
        // Listings
        .route("/blog", web::get().to(feed::blog))
        .route("/category/{category}", web::get().to(feed::category))
        .route("/author/{id}", web::get().to(feed::author))
        .route("/write", web::get().to(feed::writer))
        // Posts - fixed segments before `/posts/{id}`
        .route("/posts/search", web::get().to(posts::search))
        .route("/posts/new", web::get().to(posts::new_form))
        .route("/posts", web::post().to(posts::create))
        .service(
            web::resource("/posts/edit/{id}")
                .route(web::get().to(posts::edit_form))
                .route(web::post().to(posts::update)),
        )
        .route("/posts/delete/{id}", web::post().to(posts::delete))
        .route("/posts/{id}", web::get().to(posts::show))
        .route("/posts/{id}/like", web::post().to(social::like))
        .route("/posts/{id}/comments", web::post().to(social::comment))
        // Profile
        .route("/profile", web::get().to(profile::show))
        .service(
            web::resource("/profile/edit")
                .route(web::get().to(profile::edit_form))
                .route(web::post().to(profile::update)),
        )
        .route("/profile/avatar", web::post().to(profile::avatar))
        .route("/profile/delete", web::post().to(profile::delete))
        .route("/uploads/{filename}", web::get().to(uploads::serve));
}

/// Path ids that are not UUIDs name nothing.
fn parse_id(raw: &str, entity: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("{entity} not found")))
}
