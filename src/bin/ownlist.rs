use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::error;

use own_playlist::client::ApiClient;
use own_playlist::config::parse_level;
use own_playlist::local_state::{ClientState, LocalStorage, StateError};
use own_playlist::logger::SimpleLogger;
use own_playlist::playlist::{PlaylistError, Toggle, MAX_PLAYLIST};
use own_playlist::track::Track;

/// Search Spotify, build a playlist of up to 10 tracks and share it.
#[derive(Parser)]
#[command(name = "ownlist", version)]
struct Cli {
    /// Backend address
    #[arg(long, env = "OWNLIST_API_BASE", default_value = "http://localhost:4000")]
    api_base: String,

    /// Where the playlist and nickname are kept between runs
    #[arg(long, env = "OWNLIST_STATE")]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search for tracks
    Search { query: Vec<String> },
    /// Add or remove a track from the last search by its number
    Toggle { number: usize },
    /// Show the playlist
    List,
    /// Remove every track from the playlist
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Set the nickname shown on shared playlists
    Name { name: String },
    /// Publish the playlist and print its link
    Share {
        #[arg(long)]
        name: Option<String>,
    },
    /// Show a shared playlist
    View { id: String },
}

fn default_state_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ownlist")
        .join("state.json")
}

fn spinner(multi: &MultiProgress, message: &'static str) -> ProgressBar {
    let bar = multi.add(ProgressBar::new_spinner());
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn print_track(number: Option<usize>, track: &Track, liked: bool) {
    let marker = if liked { "♥" } else { " " };
    let prefix = number.map(|n| format!("{n:>2}. ")).unwrap_or_default();
    println!("{prefix}{marker} {}", track.title());
    println!("      {} · {}", track.artist_names(), track.album_name());
    if let Some(preview) = &track.preview_url {
        println!("      preview: {preview}");
    }
}

fn print_playlist(state: &ClientState) {
    let playlist = state.playlist();
    if playlist.is_empty() {
        println!("Like some search results to build your playlist.");
        return;
    }
    for (i, track) in playlist.tracks().iter().enumerate() {
        print_track(Some(i + 1), track, true);
    }
    if playlist.is_full() {
        println!("🎉 It's full!");
    } else {
        println!("Total: {} / {} left", playlist.len(), playlist.remaining());
    }
}

async fn view_share(client: &ApiClient, multi: &MultiProgress, id: &str) {
    let bar = spinner(multi, "Loading...");
    let result = client.fetch_share(id).await;
    bar.finish_and_clear();

    match result {
        Ok(shared) if !shared.playlist.is_empty() => {
            println!("{}'s Playlist", shared.owner_name);
            println!("{} tracks in total", shared.playlist.len());
            for track in &shared.playlist {
                print_track(None, track, false);
                if let Some(cover) = track.thumbnail() {
                    println!("      cover: {}", cover.url);
                }
                if let Some(url) = track.open_url() {
                    println!("      {url}");
                }
            }
        }
        Ok(_) => println!("Playlist not found."),
        Err(e) => {
            error!("Failed to load share {}: {}", id, e);
            println!("Playlist not found.");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let multi = MultiProgress::new();
    LogWrapper::new(multi.clone(), SimpleLogger).try_init()?;
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    log::set_max_level(parse_level(Some(level))?);

    let client = ApiClient::new(&cli.api_base)?;
    let storage = LocalStorage::open(cli.state.unwrap_or_else(default_state_path))?;
    let mut state = ClientState::load(storage);

    match cli.command {
        Command::Search { query } => {
            let query = query.join(" ");
            if query.trim().is_empty() {
                return Ok(());
            }

            let bar = spinner(&multi, "Searching...");
            let result = client.search(&query).await;
            bar.finish_and_clear();

            let tracks = match result {
                Ok(tracks) => tracks,
                Err(e) => {
                    error!("Search failed: {}", e);
                    println!("Something went wrong while searching 😢");
                    return Ok(());
                }
            };

            if tracks.is_empty() {
                println!("Search results will show up here.");
            } else {
                println!("Showing up to {} results.", tracks.len());
            }
            for (i, track) in tracks.iter().enumerate() {
                print_track(Some(i + 1), track, state.playlist().contains(&track.id));
            }
            state.set_last_search(&tracks)?;
        }
        Command::Toggle { number } => {
            let Some(track) = number
                .checked_sub(1)
                .and_then(|i| state.last_search().into_iter().nth(i))
            else {
                println!("No search result #{number}. Run a search first.");
                return Ok(());
            };

            let title = track.title().to_string();
            match state.toggle(track) {
                Ok(Toggle::Added) => println!("♥ Added {title}"),
                Ok(Toggle::Removed) => println!("Removed {title}"),
                Err(StateError::Playlist(PlaylistError::Full(_))) => {
                    println!("A playlist can hold at most {MAX_PLAYLIST} tracks!")
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::List => print_playlist(&state),
        Command::Clear { yes } => {
            if state.playlist().is_empty() {
                println!("There's no playlist to delete!");
            } else if !yes {
                println!(
                    "Delete all {} tracks? Run again with --yes to confirm.",
                    state.playlist().len()
                );
            } else {
                state.clear_playlist()?;
                println!("Playlist cleared.");
            }
        }
        Command::Name { name } => {
            state.set_owner_name(name.trim())?;
            println!(
                "Shared playlists will be titled \"{}'s Playlist\".",
                state.owner_name()
            );
        }
        Command::Share { name } => {
            if state.playlist().is_empty() {
                println!("There's no playlist to share!");
                return Ok(());
            }

            let owner_name = name
                .as_deref()
                .unwrap_or(state.owner_name())
                .trim()
                .to_string();
            if owner_name.is_empty() {
                println!(
                    "Enter a nickname to use in the playlist title 🙂 (ownlist name <nickname>)"
                );
                return Ok(());
            }
            state.set_owner_name(&owner_name)?;

            let bar = spinner(&multi, "Creating share page...");
            let result = client.create_share(&owner_name, state.playlist().tracks()).await;
            bar.finish_and_clear();

            match result {
                Ok(created) => {
                    println!("Share link: {}", created.share_url);
                    view_share(&client, &multi, &created.share_id).await;
                }
                Err(e) => {
                    error!("Share failed: {}", e);
                    println!("Something went wrong while sharing 😢");
                }
            }
        }
        Command::View { id } => view_share(&client, &multi, &id).await,
    }

    Ok(())
}
