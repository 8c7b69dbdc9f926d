//! lyrics api route, relays the provider body verbatim

use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::Settings;
use crate::core::spotify;
use crate::plugins::LyricsProvider;

#[derive(Debug, Deserialize)]
pub struct LyricsQuery {
    pub artist: String,
    pub title: String,
}

#[get("/getLyrics")]
pub async fn get_lyrics(
    settings: web::Data<Settings>,
    query: web::Query<LyricsQuery>,
) -> impl Responder {
    info!("Lyrics search: {} - {}...", query.artist, query.title);

    let provider = LyricsProvider::new(
        spotify::http_client(),
        &settings.lyrics_api_url,
        settings.lyrics_api_token.clone(),
    );

    match provider.search(&query.artist, &query.title).await {
        Ok(body) => HttpResponse::Ok()
            .content_type("application/json")
            .body(body),
        Err(err) => {
            // the caller only gets a generic failure, details stay in the log
            warn!("Lyrics lookup failed: {}", err);
            HttpResponse::BadRequest().json(serde_json::json!({
                "result": "failed to fetch lyrics"
            }))
        }
    }
}

/// configure lyrics routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_lyrics);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    macro_rules! spawn_app {
        ($settings:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($settings))
                    .service(web::scope("/api").configure(configure)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_get_lyrics_requires_artist_and_title() {
        let app = spawn_app!(Settings::for_tests());

        let req = test::TestRequest::get()
            .uri("/api/getLyrics?artist=Queen")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_lyrics_body_is_relayed_verbatim() {
        let payload = serde_json::json!([
            { "seconds": 1, "lyrics": "Is this the real life" },
            { "seconds": 5, "lyrics": "Is this just fantasy" }
        ]);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("q", "Queen Bohemian Rhapsody"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
            .mount(&server)
            .await;

        let mut settings = Settings::for_tests();
        settings.lyrics_api_url = server.uri();
        let app = spawn_app!(settings);

        let req = test::TestRequest::get()
            .uri("/api/getLyrics?artist=Queen&title=Bohemian%20Rhapsody")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, payload);
    }

    #[actix_web::test]
    async fn test_provider_failure_maps_to_fixed_400() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut settings = Settings::for_tests();
        settings.lyrics_api_url = server.uri();
        let app = spawn_app!(settings);

        let req = test::TestRequest::get()
            .uri("/api/getLyrics?artist=Nobody&title=Nothing")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            serde_json::json!({ "result": "failed to fetch lyrics" })
        );
    }
}
