use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Bad user input: rejected at the boundary before it reaches the timer or the log
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a target.")]
    EmptyTarget,

    #[error("{field} must be a whole number of minutes, got \"{input}\"")]
    InvalidDuration { field: &'static str, input: String },

    #[error("{field} must be greater than zero")]
    NonPositiveDuration { field: &'static str },
}

/// The target log could not be read or written
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        action: &'static str,
        #[source]
        source: io::Error,
    },
}

impl ResourceError {
    pub fn io(path: impl Into<PathBuf>, action: &'static str, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            action,
            source,
        }
    }
}

/// The notification sound could not be played
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Sound file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("No audio player available on this system")]
    NoPlayer,

    #[error("Failed to launch {player}: {source}")]
    Spawn {
        player: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Errors from target log operations
#[derive(Debug, Error)]
pub enum LogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Errors from starting the focus timer
#[derive(Debug, Error)]
pub enum TimerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to start timer thread: {0}")]
    Spawn(#[source] io::Error),
}
