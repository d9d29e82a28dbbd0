use std::error::Error;
use std::sync::Arc;

use log::info;

use own_playlist::api::{self, AppState};
use own_playlist::config::Config;
use own_playlist::logger;
use own_playlist::spotify::SpotifyClient;
use own_playlist::store::JsonFileStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    logger::init(config.log_level)?;

    let spotify = SpotifyClient::new(
        config.credentials(),
        &config.spotify_token_url,
        &config.spotify_api_url,
    )?;
    let shares = JsonFileStore::new(&config.share_db_path);
    info!("Share database: {}", shares.path().display());

    let state = AppState {
        spotify: Arc::new(spotify),
        shares: Arc::new(shares),
        share_base_url: config.share_base_url.clone(),
    };

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("Backend listening on http://{}", config.bind_address());
    axum::serve(listener, app).await?;

    Ok(())
}
