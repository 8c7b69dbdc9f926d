//! lyrics provider backed by the textyl search api

use anyhow::{anyhow, Result};
use reqwest::Client;

/// Lyrics search provider. The response body is relayed to the caller
/// verbatim, so no local model of the payload exists.
pub struct LyricsProvider {
    client: Client,
    api_url: String,
    api_token: Option<String>,
}

impl LyricsProvider {
    pub fn new(client: Client, api_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_token,
        }
    }

    /// Search for lyrics by artist and title.
    pub async fn search(&self, artist: &str, title: &str) -> Result<String> {
        let query = search_query(artist, title);

        let mut request = self.client.get(&self.api_url).query(&[("q", &query)]);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("lyrics api returned status {}", status));
        }

        Ok(response.text().await?)
    }
}

fn search_query(artist: &str, title: &str) -> String {
    format!("{} {}", artist, title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query() {
        assert_eq!(
            search_query("Queen", "Bohemian Rhapsody"),
            "Queen Bohemian Rhapsody"
        );
    }
}
