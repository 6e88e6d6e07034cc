//! Audio backend error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving, decoding or playing a track source.
#[derive(Error, Debug)]
pub enum MediaError {
    /// No output device could be opened at startup
    #[error("no audio output device available")]
    NoOutput,

    /// Play was requested before any source was loaded
    #[error("no audio source loaded")]
    NoSource,

    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The decoder rejected the source
    #[error("failed to decode audio: {0}")]
    Decode(String),

    /// Downloading a remote source failed
    #[error("failed to fetch {0}")]
    Fetch(String),

    #[error("unknown blob source {0}")]
    UnknownBlob(String),

    /// The audio thread did not answer in time
    #[error("audio thread timed out")]
    Timeout,

    /// The audio thread is gone
    #[error("audio thread disconnected")]
    Disconnected,
}
