//! REST API routes for remotify

pub mod auth;
pub mod lyrics;
pub mod player;

use actix_web::{http::header, web, HttpResponse};

/// Configure all API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Auth routes
        .service(web::scope("/auth").configure(auth::configure))
        // Playback proxy + lyrics routes
        .service(
            web::scope("/api")
                .configure(player::configure)
                .configure(lyrics::configure),
        )
        // Logout lives at the root, not under /auth
        .service(auth::logout);
}

/// 302 redirect to the given location.
pub(crate) fn redirect(location: impl Into<String>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}
