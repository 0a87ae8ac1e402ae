/// HTTP handlers for action-service
///
/// - Actions: post/comment CRUD, like/bookmark/follow toggles, profile update
/// - Uploads: single image upload returning a public URL
/// - Health: database readiness
pub mod actions;
pub mod health;
pub mod uploads;

use actix_web::web;

pub use health::health;

/// Register the action and upload routes.
///
/// `upload_body_limit` caps the raw upload body read by actix; images under it
/// but over the service limit still reach the handler and fail validation.
pub fn configure(upload_body_limit: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope("/api/v1/actions")
                .route("/posts", web::post().to(actions::create_post))
                .route("/posts", web::put().to(actions::update_post))
                .route("/posts/delete", web::post().to(actions::delete_post))
                .route("/likes", web::post().to(actions::like_post))
                .route("/bookmarks", web::post().to(actions::bookmark_post))
                .route("/follows", web::post().to(actions::follow_user))
                .route("/comments", web::post().to(actions::create_comment))
                .route("/comments/delete", web::post().to(actions::delete_comment))
                .route("/profile", web::put().to(actions::update_profile)),
        )
        .service(
            web::resource("/api/v1/uploads")
                .app_data(web::PayloadConfig::new(upload_body_limit))
                .route(web::post().to(uploads::upload_image)),
        );
    }
}
