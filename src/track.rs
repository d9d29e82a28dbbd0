use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A catalog entry as returned by the Spotify search endpoint.
///
/// Only the fields the client renders are typed; everything else the catalog
/// sends is kept in `extra` so a stored playlist round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<Album>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artists: Option<Vec<Artist>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_urls: Option<ExternalUrls>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub name: String,
    /// Ordered by descending resolution.
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Track {
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn artist_names(&self) -> String {
        self.artists
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn album_name(&self) -> &str {
        self.album.as_ref().map(|a| a.name.as_str()).unwrap_or("")
    }

    // The catalog sends 640/300/64px variants; the 64px one is the thumbnail
    pub fn thumbnail(&self) -> Option<&Image> {
        let images = &self.album.as_ref()?.images;
        images.get(2).or_else(|| images.last())
    }

    pub fn open_url(&self) -> Option<&str> {
        self.external_urls.as_ref()?.spotify.as_deref()
    }
}

/// The part of a search response the client reads.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<Track>,
}

impl SearchResults {
    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks.map(|page| page.items).unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) fn sample_track(id: &str) -> Track {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": format!("Song {id}"),
        "album": {
            "name": "Album",
            "images": [
                { "url": "https://i.scdn.co/image/640", "height": 640, "width": 640 },
                { "url": "https://i.scdn.co/image/300", "height": 300, "width": 300 },
                { "url": "https://i.scdn.co/image/64", "height": 64, "width": 64 }
            ]
        },
        "artists": [{ "name": "First" }, { "name": "Second" }],
        "preview_url": null,
        "external_urls": { "spotify": format!("https://open.spotify.com/track/{id}") }
    }))
    .unwrap()
}
