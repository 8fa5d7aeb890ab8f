use std::path::PathBuf;

use thiserror::Error;
use tower_chimes_music::PlaybackError;
use tower_chimes_sim::SimError;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid setting: {0}")]
    Invalid(String),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error("failed to start driver thread: {0}")]
    Spawn(#[source] std::io::Error),
}
