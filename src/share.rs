use chrono::{DateTime, SubsecRound, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_OWNER_NAME: &str = "Someone";
pub const SHARE_ID_LEN: usize = 8;

const SHARE_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A published playlist snapshot as it sits in the store, keyed by its share id.
///
/// Playlist entries are kept as raw JSON, so every field the client submitted
/// (including explicit nulls) is handed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRecord {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    pub playlist: Vec<Value>,
}

impl ShareRecord {
    pub fn new(owner_name: Option<&str>, playlist: Vec<Value>) -> Self {
        Self {
            // persisted with millisecond precision
            created_at: Utc::now().trunc_subsecs(3),
            owner_name: Some(normalize_owner_name(owner_name)),
            playlist,
        }
    }

    pub fn owner_name(&self) -> &str {
        match self.owner_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_OWNER_NAME,
        }
    }
}

pub fn normalize_owner_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => DEFAULT_OWNER_NAME.to_string(),
    }
}

pub fn generate_share_id() -> String {
    let mut rng = rand::rng();
    (0..SHARE_ID_LEN)
        .map(|_| SHARE_ID_ALPHABET[rng.random_range(0..SHARE_ID_ALPHABET.len())] as char)
        .collect()
}

pub fn share_url(base: &str, id: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), id)
}
