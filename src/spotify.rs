use bytes::Bytes;
use chrono::Utc;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::token::TokenCache;

pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1/";

#[derive(Debug, thiserror::Error)]
pub enum SpotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token request rejected with status {status}: {body}")]
    Token { status: StatusCode, body: String },

    #[error("Search request rejected with status {0}")]
    Search(StatusCode),

    #[error("Token lifetime out of range: {0}s")]
    TokenLifetime(i64),

    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Client-credentials access to the Spotify Web API.
pub struct SpotifyClient {
    client: Client,
    credentials: Credentials,
    token_url: Url,
    search_url: Url,
    tokens: TokenCache,
}

impl SpotifyClient {
    pub fn new(
        credentials: Credentials,
        token_url: &str,
        api_url: &str,
    ) -> Result<Self, SpotifyError> {
        let token_url = Url::parse(token_url)?;
        let search_url = Url::parse(api_url)?.join("search")?;

        Ok(Self {
            client: Client::new(),
            credentials,
            token_url,
            search_url,
            tokens: TokenCache::new(),
        })
    }

    pub async fn access_token(&self) -> Result<String, SpotifyError> {
        if let Some(token) = self.tokens.get(Utc::now()) {
            return Ok(token);
        }

        let requested_at = Utc::now();
        let token = self.request_token().await?;
        debug!("Fetched Spotify token valid for {}s", token.expires_in);

        let cached = self
            .tokens
            .store(token.access_token, token.expires_in, requested_at)
            .ok_or(SpotifyError::TokenLifetime(token.expires_in))?;
        Ok(cached.value)
    }

    async fn request_token(&self) -> Result<TokenResponse, SpotifyError> {
        let response = self
            .client
            .post(self.token_url.clone())
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpotifyError::Token { status, body });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Runs a track search and hands back the provider's JSON body untouched.
    pub async fn search_tracks(&self, query: &str) -> Result<Bytes, SpotifyError> {
        let token = self.access_token().await?;

        debug!("Searching Spotify tracks for: {}", query);

        let response = self
            .client
            .get(self.search_url.clone())
            .query(&[("type", "track"), ("q", query)])
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // Provider revoked the token early; make the next call fetch a fresh one
            warn!("Spotify rejected cached token, dropping it");
            self.tokens.clear();
        }
        if !status.is_success() {
            return Err(SpotifyError::Search(status));
        }

        let body = response.bytes().await?;
        serde_json::from_slice::<serde::de::IgnoredAny>(&body)?;
        Ok(body)
    }
}
