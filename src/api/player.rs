//! playback proxy api routes, one upstream call per request

use actix_web::http::StatusCode;
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use tracing::{info, warn};

use super::{auth, redirect};
use crate::config::Settings;
use crate::core::spotify::{self, SpotifyClient, SpotifyError};

#[derive(Debug, Deserialize)]
pub struct SeekQuery {
    /// Absolute position in milliseconds, forwarded verbatim.
    pub position: u64,
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Previous,
    Next,
    Pause,
    Play,
    Seek(u64),
}

impl Command {
    fn describe(&self) -> String {
        match self {
            Command::Previous => "skipped to previous song".to_string(),
            Command::Next => "skipped to next song".to_string(),
            Command::Pause => "paused".to_string(),
            Command::Play => "played".to_string(),
            Command::Seek(position_ms) => format!("seeked to {}ms", position_ms),
        }
    }
}

#[get("/previous")]
pub async fn previous(settings: web::Data<Settings>, req: HttpRequest) -> impl Responder {
    run_command(&settings, &req, Command::Previous).await
}

#[get("/next")]
pub async fn next(settings: web::Data<Settings>, req: HttpRequest) -> impl Responder {
    run_command(&settings, &req, Command::Next).await
}

#[get("/pause")]
pub async fn pause(settings: web::Data<Settings>, req: HttpRequest) -> impl Responder {
    run_command(&settings, &req, Command::Pause).await
}

#[get("/play")]
pub async fn play(settings: web::Data<Settings>, req: HttpRequest) -> impl Responder {
    run_command(&settings, &req, Command::Play).await
}

#[get("/seek")]
pub async fn seek(
    settings: web::Data<Settings>,
    req: HttpRequest,
    query: web::Query<SeekQuery>,
) -> impl Responder {
    run_command(&settings, &req, Command::Seek(query.position)).await
}

/// relay the provider's currently-playing payload unmodified
#[get("/getCurrentSong")]
pub async fn get_current_song(settings: web::Data<Settings>, req: HttpRequest) -> impl Responder {
    let Some(token) = auth::access_token(&req) else {
        return missing_token();
    };

    let client = SpotifyClient::new(spotify::http_client(), &settings.api_url, token);
    match client.currently_playing().await {
        Ok(body) => HttpResponse::Ok()
            .content_type("application/json")
            .body(body),
        Err(err) => {
            warn!("Error fetching current song: {}", err);
            current_song_failure(&settings, &err)
        }
    }
}

// helpers

async fn run_command(settings: &Settings, req: &HttpRequest, command: Command) -> HttpResponse {
    let Some(token) = auth::access_token(req) else {
        return missing_token();
    };

    let client = SpotifyClient::new(spotify::http_client(), &settings.api_url, token);
    let result = match command {
        Command::Previous => client.skip_previous().await,
        Command::Next => client.skip_next().await,
        Command::Pause => client.pause().await,
        Command::Play => client.play().await,
        Command::Seek(position_ms) => client.seek(position_ms).await,
    };

    match result {
        Ok(()) => {
            info!("User {}", command.describe());
            HttpResponse::Ok().json(serde_json::json!({ "result": "success" }))
        }
        Err(err) => {
            warn!("Error running {}: {}", command.describe(), err);
            command_failure(settings, &err)
        }
    }
}

fn missing_token() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({ "error": "No access token" }))
}

/// Auth failures send the browser back through the consent flow; every
/// other upstream status is relayed as-is.
fn command_failure(settings: &Settings, err: &SpotifyError) -> HttpResponse {
    match err.status() {
        Some(401) | Some(403) => redirect(format!("{}/auth/spotify", settings.host)),
        Some(code) => relay_error(code),
        None => relay_error(502),
    }
}

/// The current-song endpoint only needs a fresh token, not a new consent,
/// so auth failures go to the refresh route instead.
fn current_song_failure(settings: &Settings, err: &SpotifyError) -> HttpResponse {
    match err.status() {
        Some(401) | Some(403) => redirect(format!("{}/auth/refresh", settings.host)),
        Some(code) => relay_error(code),
        None => relay_error(502),
    }
}

fn relay_error(code: u16) -> HttpResponse {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY);
    HttpResponse::build(status).json(serde_json::json!({ "error": code }))
}

/// configure playback proxy routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(previous)
        .service(next)
        .service(pause)
        .service(play)
        .service(seek)
        .service(get_current_song);
}
