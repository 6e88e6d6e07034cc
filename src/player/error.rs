use thiserror::Error;

use crate::audio::MediaError;
use crate::library::ListingError;

/// Failures surfaced by controller operations. Each maps to a user-facing notice.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Deliberately silent on the reason.
    #[error("Incorrect password")]
    AuthFailure,

    #[error("Admin access required")]
    NotAuthorized,

    #[error("Upload failed: {0}")]
    UploadFailure(String),

    #[error("Playback failed: {0}")]
    PlaybackFailure(#[source] MediaError),

    #[error("Track unavailable")]
    TrackUnavailable,

    #[error("No tracks available")]
    NoTracks,

    #[error("No playable tracks found")]
    NoAvailableTracks,

    #[error("Failed to load track list: {0}")]
    RemoteFetchFailure(#[from] ListingError),

    #[error("Default tracks cannot be removed")]
    RemoveRestriction,

    #[error("Unknown track {0:?}")]
    UnknownTrack(String),

    #[error("No track at position {0}")]
    InvalidIndex(usize),

    #[error("Volume must be a finite number")]
    InvalidVolume,

    #[error("Not available with this track source")]
    Unsupported,
}
