use std::env;

use log::LevelFilter;

use crate::spotify::{Credentials, SPOTIFY_API_URL, SPOTIFY_TOKEN_URL};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

pub struct Config {
    pub api_host: String,
    pub api_port: u16,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_token_url: String,
    pub spotify_api_url: String,
    pub share_db_path: String,
    pub share_base_url: String,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: parse_port(env::var("API_PORT").or_else(|_| env::var("PORT")).ok())?,
            spotify_client_id: required("SPOTIFY_CLIENT_ID")?,
            spotify_client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            spotify_token_url: env::var("SPOTIFY_TOKEN_URL")
                .unwrap_or_else(|_| SPOTIFY_TOKEN_URL.to_string()),
            spotify_api_url: env::var("SPOTIFY_API_URL")
                .unwrap_or_else(|_| SPOTIFY_API_URL.to_string()),
            share_db_path: env::var("SHARE_DB_PATH")
                .unwrap_or_else(|_| "playlist.json".to_string()),
            share_base_url: env::var("SHARE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/share/".to_string()),
            log_level: parse_level(env::var("LOG_LEVEL").ok())?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: self.spotify_client_id.clone(),
            client_secret: self.spotify_client_secret.clone(),
        }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse_port(value: Option<String>) -> Result<u16, ConfigError> {
    match value {
        None => Ok(4000),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name: "API_PORT",
            value,
        }),
    }
}

pub fn parse_level(value: Option<String>) -> Result<LevelFilter, ConfigError> {
    match value {
        None => Ok(LevelFilter::Info),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name: "LOG_LEVEL",
            value,
        }),
    }
}
