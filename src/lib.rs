pub mod api;
pub mod client;
pub mod config;
pub mod local_state;
pub mod logger;
pub mod playlist;
pub mod share;
pub mod spotify;
pub mod store;
pub mod token;
pub mod track;
