//! environment sourced settings loaded once at startup

use anyhow::{Context, Result};

const DEFAULT_HOST: &str = "http://localhost:8000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_PORT: u16 = 3000;

const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_LYRICS_API_URL: &str = "https://api.textyl.co/api/lyrics";

/// Process-wide settings, loaded once in `main` and shared with the
/// handlers as immutable app data.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Spotify application client id
    pub client_id: String,

    /// Spotify application client secret
    pub client_secret: String,

    /// Space-separated OAuth scopes requested at login
    pub scopes: String,

    /// Redirect URI registered with Spotify for the code exchange
    pub callback_url: String,

    /// Public base URL of this server, used as redirect target
    pub host: String,

    /// Front-end URL the browser lands on after a successful login
    pub return_url: String,

    /// Origin allowed to make credentialed CORS requests
    pub cors_origin: String,

    /// Listening port
    pub port: u16,

    /// Base URL of the Spotify accounts service (consent + token endpoints)
    pub accounts_url: String,

    /// Base URL of the Spotify Web API
    pub api_url: String,

    /// URL of the lyrics search API
    pub lyrics_api_url: String,

    /// Optional bearer token for the lyrics API
    pub lyrics_api_token: Option<String>,

    /// Production mode, enables the Secure flag on session cookies
    pub production: bool,
}

impl Settings {
    /// Build settings from a key lookup. Split out from [`Settings::load`]
    /// so tests can feed values without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let client_id = lookup("SPOTIFY_CLIENT_ID").context("SPOTIFY_CLIENT_ID is not set")?;
        let client_secret =
            lookup("SPOTIFY_CLIENT_SECRET").context("SPOTIFY_CLIENT_SECRET is not set")?;

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let callback_url =
            lookup("SPOTIFY_CALLBACK_URL").unwrap_or_else(|| format!("{}/auth/callback", host));
        let scopes = lookup("SPOTIFY_SCOPES").unwrap_or_else(default_scopes);
        let return_url = lookup("RETURN_URL").unwrap_or_else(|| host.clone());
        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());

        let port = match lookup("PORT") {
            Some(value) => value.parse().context("PORT must be a number")?,
            None => DEFAULT_PORT,
        };

        let accounts_url = lookup("SPOTIFY_ACCOUNTS_URL")
            .unwrap_or_else(|| DEFAULT_ACCOUNTS_URL.to_string());
        let api_url = lookup("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let lyrics_api_url =
            lookup("LYRICS_API_URL").unwrap_or_else(|| DEFAULT_LYRICS_API_URL.to_string());

        let lyrics_api_token = lookup("LYRICS_API_TOKEN").filter(|t| !t.trim().is_empty());
        let production = lookup("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Self {
            client_id,
            client_secret,
            scopes,
            callback_url,
            host,
            return_url,
            cors_origin,
            port,
            accounts_url,
            api_url,
            lyrics_api_url,
            lyrics_api_token,
            production,
        })
    }

    /// Load settings from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::from_lookup(|key| match key {
            "SPOTIFY_CLIENT_ID" => Some("test-client-id".to_string()),
            "SPOTIFY_CLIENT_SECRET" => Some("test-client-secret".to_string()),
            _ => None,
        })
        .expect("test settings should build")
    }
}

fn default_scopes() -> String {
    [
        "user-modify-playback-state",
        "user-read-playback-state",
        "user-read-currently-playing",
    ]
    .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(key: &str) -> Option<String> {
        match key {
            "SPOTIFY_CLIENT_ID" => Some("id".to_string()),
            "SPOTIFY_CLIENT_SECRET" => Some("secret".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(minimal).unwrap();
        assert_eq!(settings.host, "http://localhost:8000");
        assert_eq!(settings.callback_url, "http://localhost:8000/auth/callback");
        assert_eq!(settings.return_url, settings.host);
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.accounts_url, "https://accounts.spotify.com");
        assert_eq!(settings.api_url, "https://api.spotify.com/v1");
        assert_eq!(settings.lyrics_api_url, "https://api.textyl.co/api/lyrics");
        assert!(settings.scopes.contains("user-modify-playback-state"));
        assert!(settings.lyrics_api_token.is_none());
        assert!(!settings.production);
    }

    #[test]
    fn test_missing_credentials() {
        assert!(Settings::from_lookup(|_| None).is_err());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(|key| match key {
            "HOST" => Some("https://example.com".to_string()),
            "PORT" => Some("8080".to_string()),
            "RETURN_URL" => Some("https://app.example.com".to_string()),
            "SPOTIFY_API_URL" => Some("http://localhost:9090/v1".to_string()),
            "APP_ENV" => Some("production".to_string()),
            "LYRICS_API_TOKEN" => Some("abc".to_string()),
            other => minimal(other),
        })
        .unwrap();

        assert_eq!(settings.callback_url, "https://example.com/auth/callback");
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.return_url, "https://app.example.com");
        assert_eq!(settings.api_url, "http://localhost:9090/v1");
        assert_eq!(settings.lyrics_api_token.as_deref(), Some("abc"));
        assert!(settings.production);
    }

    #[test]
    fn test_bad_port() {
        let settings = Settings::from_lookup(|key| match key {
            "PORT" => Some("not-a-port".to_string()),
            other => minimal(other),
        });
        assert!(settings.is_err());
    }

    #[test]
    fn test_blank_lyrics_token_ignored() {
        let settings = Settings::from_lookup(|key| match key {
            "LYRICS_API_TOKEN" => Some("   ".to_string()),
            other => minimal(other),
        })
        .unwrap();
        assert!(settings.lyrics_api_token.is_none());
    }
}
