use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::playlist::{Playlist, PlaylistError, Toggle};
use crate::track::Track;

pub const PLAYLIST_KEY: &str = "playlist";
pub const OWNER_NAME_KEY: &str = "ownerName";
pub const LAST_SEARCH_KEY: &str = "lastSearch";

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode client state: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Playlist(#[from] PlaylistError),
}

/// String key/value pairs persisted to a JSON file, written through on every change.
pub struct LocalStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl LocalStorage {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StateError> {
        let path = path.into();
        let items = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable state file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StateError::Io { path, source }),
        };

        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: String) -> Result<(), StateError> {
        self.items.insert(key.to_string(), value);
        self.flush()
    }

    fn flush(&self) -> Result<(), StateError> {
        let io_err = |source| StateError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(&self.path, json).map_err(io_err)
    }
}

/// The client's persisted view: playlist, sharing nickname and the latest search results.
pub struct ClientState {
    storage: LocalStorage,
    playlist: Playlist,
}

impl ClientState {
    pub fn load(storage: LocalStorage) -> Self {
        let stored: Vec<Track> = read_json(&storage, PLAYLIST_KEY).unwrap_or_default();
        let playlist = Playlist::from_tracks(stored);
        debug!("Loaded {} playlist tracks from {}", playlist.len(), storage.path().display());

        Self { storage, playlist }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn toggle(&mut self, track: Track) -> Result<Toggle, StateError> {
        let outcome = self.playlist.toggle(track)?;
        self.save_playlist()?;
        Ok(outcome)
    }

    pub fn clear_playlist(&mut self) -> Result<(), StateError> {
        self.playlist.clear();
        self.save_playlist()
    }

    pub fn owner_name(&self) -> &str {
        self.storage.get_item(OWNER_NAME_KEY).unwrap_or("")
    }

    /// Blank names are not persisted so a previously saved name survives.
    pub fn set_owner_name(&mut self, name: &str) -> Result<(), StateError> {
        if name.is_empty() {
            return Ok(());
        }
        self.storage.set_item(OWNER_NAME_KEY, name.to_string())
    }

    pub fn last_search(&self) -> Vec<Track> {
        read_json(&self.storage, LAST_SEARCH_KEY).unwrap_or_default()
    }

    pub fn set_last_search(&mut self, tracks: &[Track]) -> Result<(), StateError> {
        self.storage.set_item(LAST_SEARCH_KEY, serde_json::to_string(tracks)?)
    }

    fn save_playlist(&mut self) -> Result<(), StateError> {
        let json = serde_json::to_string(self.playlist.tracks())?;
        self.storage.set_item(PLAYLIST_KEY, json)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(storage: &LocalStorage, key: &str) -> Option<T> {
    let raw = storage.get_item(key)?;
    serde_json::from_str(raw)
        .map_err(|e| warn!("Discarding stored {}: {}", key, e))
        .ok()
}
