//! HTTP handlers and route configuration.

mod accounts;
mod assist;
mod blogs;
mod engagement;
mod health;
mod uploads;
mod users;

use actix_web::{HttpRequest, error::JsonPayloadError, web};

use crate::middleware::error::AppError;

/// Largest accepted JSON body. Post content travels inline.
const JSON_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// JSON extractor settings: size limit and problem-details errors for
/// malformed bodies.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            AppError::BadRequest(err.to_string()).into()
        })
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health::health_check))
        // Accounts
        .route("/signup", web::post().to(accounts::signup))
        .route("/signin", web::post().to(accounts::signin))
        .route("/google-auth", web::post().to(accounts::google_auth))
        .route("/change-password", web::post().to(accounts::change_password))
        // Posts
        .route("/create-blog", web::post().to(blogs::create_blog))
        .route("/get-blog", web::post().to(blogs::get_blog))
        .route("/latest-blogs", web::post().to(blogs::latest_blogs))
        .route(
            "/all-latest-blogs-count",
            web::post().to(blogs::latest_blogs_count),
        )
        .route("/trending-blogs", web::get().to(blogs::trending_blogs))
        .route("/search-blogs", web::post().to(blogs::search_blogs))
        .route("/search-blogs-count", web::post().to(blogs::search_blogs_count))
        // Users
        .route("/search-users", web::post().to(users::search_users))
        .route("/get-profile", web::post().to(users::get_profile))
        // Likes
        .route("/like-blog", web::post().to(engagement::like_blog))
        .route("/isliked-by-user", web::post().to(engagement::is_liked_by_user))
        // Assist
        .route("/generate-tags", web::post().to(assist::generate_tags))
        .route("/generate-summary", web::post().to(assist::generate_summary))
        // Uploads
        .route("/get-upload-url", web::get().to(uploads::get_upload_url));
}
