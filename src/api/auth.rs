//! authentication api routes cookie based spotify oauth

use actix_web::cookie::{time::Duration as CookieDuration, Cookie};
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use tracing::{info, warn};

use super::redirect;
use crate::config::Settings;
use crate::core::spotify;

const COOKIE_MAX_AGE: i64 = 7 * 24 * 3600; // 7 days in seconds

/// Client-readable flag telling the front end a session exists.
pub(crate) const LOGGED_IN_COOKIE: &str = "loggedIn";
/// HTTP-only access token cookie.
pub(crate) const ACCESS_TOKEN_COOKIE: &str = "user.token";
/// HTTP-only refresh token cookie.
pub(crate) const REFRESH_TOKEN_COOKIE: &str = "user.refresh";

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// start the authorization-code flow at spotify's consent screen
#[get("/spotify")]
pub async fn spotify_login(settings: web::Data<Settings>) -> impl Responder {
    redirect(spotify::authorize_url(&settings))
}

/// oauth callback, exchanges the code and plants the session cookies
#[get("/callback")]
pub async fn callback(
    settings: web::Data<Settings>,
    query: web::Query<CallbackQuery>,
) -> impl Responder {
    if let Some(error) = &query.error {
        warn!("Authorization denied by provider: {}", error);
        return redirect("/");
    }

    let Some(code) = &query.code else {
        warn!("Callback hit without an authorization code");
        return redirect("/");
    };

    match spotify::exchange_code(&spotify::http_client(), &settings, code).await {
        Ok(token) => {
            info!("User logged in");

            let mut response = HttpResponse::Found();
            response
                .cookie(build_logged_in_cookie(settings.production))
                .cookie(build_token_cookie(
                    ACCESS_TOKEN_COOKIE,
                    &token.access_token,
                    settings.production,
                ));

            // a refresh token is only issued on the initial exchange, never
            // plant an empty cookie when it is missing
            if let Some(refresh_value) = token.refresh_token.as_deref().filter(|v| !v.is_empty()) {
                response.cookie(build_token_cookie(
                    REFRESH_TOKEN_COOKIE,
                    refresh_value,
                    settings.production,
                ));
            }

            response
                .insert_header(("Location", settings.return_url.clone()))
                .finish()
        }
        Err(err) => {
            warn!("Code exchange failed: {}", err);
            redirect("/")
        }
    }
}

/// refresh the access token from the refresh-token cookie
#[get("/refresh")]
pub async fn refresh(settings: web::Data<Settings>, req: HttpRequest) -> impl Responder {
    info!("Refreshing access token");

    let Some(refresh_token) = refresh_token(&req) else {
        warn!("No refresh token cookie, kicking to /logout");
        return redirect(format!("{}/logout", settings.host));
    };

    match spotify::refresh_access_token(&spotify::http_client(), &settings, &refresh_token).await {
        Ok(token) => {
            info!("Got new access token");
            HttpResponse::Found()
                .cookie(build_token_cookie(
                    ACCESS_TOKEN_COOKIE,
                    &token.access_token,
                    settings.production,
                ))
                .insert_header(("Location", settings.host.clone()))
                .finish()
        }
        Err(err) => {
            warn!("Error refreshing token, kicking to /logout: {}", err);
            redirect(format!("{}/logout", settings.host))
        }
    }
}

/// clear the session cookies, no external call involved
#[get("/logout")]
pub async fn logout(settings: web::Data<Settings>) -> impl Responder {
    info!("Logging out user");

    HttpResponse::Found()
        .cookie(clear_cookie(LOGGED_IN_COOKIE, false))
        .cookie(clear_cookie(ACCESS_TOKEN_COOKIE, true))
        .cookie(clear_cookie(REFRESH_TOKEN_COOKIE, true))
        .insert_header(("Location", settings.host.clone()))
        .finish()
}

// helpers

/// Access token from the request cookies. Empty values count as absent.
pub(crate) fn access_token(req: &HttpRequest) -> Option<String> {
    req.cookie(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn refresh_token(req: &HttpRequest) -> Option<String> {
    req.cookie(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

fn build_token_cookie(name: &'static str, value: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(name, value.to_string())
        .path("/")
        .http_only(true)
        .secure(secure)
        .max_age(CookieDuration::seconds(COOKIE_MAX_AGE))
        .finish()
}

fn build_logged_in_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build(LOGGED_IN_COOKIE, "true")
        .path("/")
        .http_only(false)
        .secure(secure)
        .max_age(CookieDuration::seconds(COOKIE_MAX_AGE))
        .finish()
}

fn clear_cookie(name: &'static str, http_only: bool) -> Cookie<'static> {
    Cookie::build(name, "")
        .path("/")
        .http_only(http_only)
        .max_age(CookieDuration::seconds(0))
        .finish()
}

/// configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(spotify_login).service(callback).service(refresh);
}
