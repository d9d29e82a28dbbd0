use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::share::DEFAULT_OWNER_NAME;
use crate::track::{SearchResults, Track};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API address: {0}")]
    Url(#[from] url::ParseError),

    #[error("Server rejected the request: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShareCreated {
    pub share_id: String,
    pub share_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SharedPlaylist {
    pub owner_name: String,
    pub playlist: Vec<Track>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareBody<'a> {
    owner_name: &'a str,
    playlist: &'a [Track],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShareEnvelope {
    #[serde(default)]
    success: bool,
    share_id: Option<String>,
    share_url: Option<String>,
    owner_name: Option<String>,
    playlist: Option<Vec<Track>>,
    message: Option<String>,
}

impl ShareEnvelope {
    fn rejection(self) -> ClientError {
        ClientError::Rejected(self.message.unwrap_or_else(|| "no details".to_string()))
    }
}

/// Talks to the playlist backend over HTTP.
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Track>, ClientError> {
        let url = self.base_url.join("api/search")?;
        debug!("GET {} q={}", url, query);

        let results: SearchResults = self
            .client
            .get(url)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(results.into_tracks())
    }

    pub async fn create_share(
        &self,
        owner_name: &str,
        playlist: &[Track],
    ) -> Result<ShareCreated, ClientError> {
        let url = self.base_url.join("api/share")?;
        debug!("POST {} ({} tracks)", url, playlist.len());

        let envelope: ShareEnvelope = self
            .client
            .post(url)
            .json(&ShareBody { owner_name, playlist })
            .send()
            .await?
            .json()
            .await?;

        match envelope {
            ShareEnvelope {
                success: true,
                share_id: Some(share_id),
                share_url,
                ..
            } => Ok(ShareCreated {
                share_url: share_url.unwrap_or_default(),
                share_id,
            }),
            other => Err(other.rejection()),
        }
    }

    pub async fn fetch_share(&self, id: &str) -> Result<SharedPlaylist, ClientError> {
        let mut url = self.base_url.join("api/share/")?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(id);
        debug!("GET {}", url);

        let envelope: ShareEnvelope = self.client.get(url).send().await?.json().await?;

        if !envelope.success {
            return Err(envelope.rejection());
        }

        Ok(SharedPlaylist {
            owner_name: envelope
                .owner_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_OWNER_NAME.to_string()),
            playlist: envelope.playlist.unwrap_or_default(),
        })
    }
}
