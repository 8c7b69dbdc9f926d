//! spotify web api client built per request from cookie tokens

use once_cell::sync::Lazy;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::config::Settings;

static HTTP: Lazy<Client> = Lazy::new(Client::new);

/// Shared outbound HTTP client. Cloning is cheap, the pool is reused.
pub fn http_client() -> Client {
    HTTP.clone()
}

#[derive(Debug, Error)]
pub enum SpotifyError {
    /// Spotify answered with a non-success status.
    #[error("spotify returned status {0}")]
    Status(u16),

    /// The request never produced a usable response.
    #[error("spotify request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl SpotifyError {
    /// Upstream status code, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SpotifyError::Status(code) => Some(*code),
            SpotifyError::Http(err) => err.status().map(|s| s.as_u16()),
        }
    }
}

/// Token endpoint response. `refresh_token` is only present on the
/// initial code exchange, not on refreshes.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: u64,
}

/// Consent-screen URL for the authorization-code flow.
pub fn authorize_url(settings: &Settings) -> String {
    let base = format!("{}/authorize", settings.accounts_url);
    let params = [
        ("response_type", "code"),
        ("client_id", settings.client_id.as_str()),
        ("scope", settings.scopes.as_str()),
        ("redirect_uri", settings.callback_url.as_str()),
    ];

    match Url::parse_with_params(&base, &params) {
        Ok(url) => url.to_string(),
        // the base comes from validated settings, this arm is unreachable
        // with a well-formed accounts url
        Err(_) => base,
    }
}

/// Exchange an authorization code for an access/refresh token pair.
pub async fn exchange_code(
    http: &Client,
    settings: &Settings,
    code: &str,
) -> Result<TokenResponse, SpotifyError> {
    request_token(
        http,
        settings,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", settings.callback_url.as_str()),
            ("client_id", settings.client_id.as_str()),
            ("client_secret", settings.client_secret.as_str()),
        ],
    )
    .await
}

/// Obtain a fresh access token from a refresh token.
pub async fn refresh_access_token(
    http: &Client,
    settings: &Settings,
    refresh_token: &str,
) -> Result<TokenResponse, SpotifyError> {
    request_token(
        http,
        settings,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", settings.client_id.as_str()),
            ("client_secret", settings.client_secret.as_str()),
        ],
    )
    .await
}

async fn request_token(
    http: &Client,
    settings: &Settings,
    form: &[(&str, &str)],
) -> Result<TokenResponse, SpotifyError> {
    let url = format!("{}/api/token", settings.accounts_url);
    let response = http.post(url).form(form).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SpotifyError::Status(status.as_u16()));
    }

    Ok(response.json().await?)
}

/// Per-request player client. Built from the access-token cookie and
/// dropped when the request finishes, so requests never share token state.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    access_token: String,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            access_token: access_token.into(),
        }
    }

    pub async fn skip_previous(&self) -> Result<(), SpotifyError> {
        self.send(self.http.post(self.endpoint("me/player/previous")))
            .await
            .map(|_| ())
    }

    pub async fn skip_next(&self) -> Result<(), SpotifyError> {
        self.send(self.http.post(self.endpoint("me/player/next")))
            .await
            .map(|_| ())
    }

    pub async fn pause(&self) -> Result<(), SpotifyError> {
        self.send(self.http.put(self.endpoint("me/player/pause")))
            .await
            .map(|_| ())
    }

    pub async fn play(&self) -> Result<(), SpotifyError> {
        self.send(self.http.put(self.endpoint("me/player/play")))
            .await
            .map(|_| ())
    }

    /// Seek to an absolute position in the playing track. The millisecond
    /// offset is forwarded unchanged.
    pub async fn seek(&self, position_ms: u64) -> Result<(), SpotifyError> {
        self.send(self.http.put(self.seek_url(position_ms)))
            .await
            .map(|_| ())
    }

    /// Raw currently-playing payload, relayed to the caller verbatim.
    pub async fn currently_playing(&self) -> Result<String, SpotifyError> {
        let response = self
            .send(self.http.get(self.endpoint("me/player/currently-playing")))
            .await?;
        Ok(response.text().await?)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, SpotifyError> {
        let response = request.bearer_auth(&self.access_token).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpotifyError::Status(status.as_u16()));
        }

        Ok(response)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    fn seek_url(&self, position_ms: u64) -> String {
        format!("{}/me/player/seek?position_ms={}", self.api_url, position_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url() {
        let mut settings = Settings::for_tests();
        settings.client_id = "my-client".to_string();

        let url = authorize_url(&settings);
        assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=my-client"));
        assert!(url.contains("user-modify-playback-state"));
        // the redirect uri must be percent-encoded
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8000%2Fauth%2Fcallback"));
    }

    #[test]
    fn test_seek_url_forwards_position_verbatim() {
        let client = SpotifyClient::new(http_client(), "https://api.spotify.com/v1", "tok");
        assert_eq!(
            client.seek_url(30000),
            "https://api.spotify.com/v1/me/player/seek?position_ms=30000"
        );
    }

    #[test]
    fn test_error_status() {
        assert_eq!(SpotifyError::Status(403).status(), Some(403));
        assert_eq!(SpotifyError::Status(500).status(), Some(500));
    }

    #[test]
    fn test_token_response_without_refresh() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc", "expires_in": 3600}"#).unwrap();
        assert_eq!(token.access_token, "abc");
        assert!(token.refresh_token.is_none());
        assert_eq!(token.expires_in, 3600);
    }

    #[test]
    fn test_token_response_with_refresh() {
        let token: TokenResponse = serde_json::from_str(
            r#"{"access_token": "abc", "refresh_token": "def", "expires_in": 3600, "scope": "x"}"#,
        )
        .unwrap();
        assert_eq!(token.refresh_token.as_deref(), Some("def"));
    }
}
