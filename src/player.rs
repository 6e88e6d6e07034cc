//! Track player controller: track list, playback state machine, probing,
//! delayed autoplay and the admin operations.

mod controller;
mod error;
mod pending;
mod state;

pub use controller::{Controller, ControllerOptions, Direction, Prompt, Toggle, TrackSource, new_upload_id};
pub use error::PlayerError;
pub use pending::PendingPlay;
pub use state::{NO_AUDIO_LOADED, PlaybackState, PlayerState};
