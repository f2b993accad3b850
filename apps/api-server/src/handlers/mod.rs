//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::json_error_handler;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list_posts))
                        .route("", web::post().to(posts::create_post))
                        .route("/{post_id}", web::put().to(posts::edit_post))
                        .route("/{post_id}", web::delete().to(posts::delete_post))
                        .route("/{post_id}/comments", web::post().to(comments::add_comment))
                        .route(
                            "/{post_id}/comments/{comment_id}",
                            web::delete().to(comments::delete_comment),
                        ),
                ),
        );
}
