use crate::library::{Track, TrackList};

pub const NO_AUDIO_LOADED: &str = "No audio loaded";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Observable player state. Only the controller mutates it.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub tracks: TrackList,
    /// Always a valid index into `tracks`, or `None` when the list is empty.
    pub current: Option<usize>,
    pub playback: PlaybackState,
    pub volume: f32,
    /// Result of the last probe of the current track.
    pub current_valid: bool,
    pub track_name: String,
}

impl PlayerState {
    pub fn new(volume: f32) -> Self {
        Self {
            tracks: TrackList::new(),
            current: None,
            playback: PlaybackState::Idle,
            volume,
            current_valid: false,
            track_name: NO_AUDIO_LOADED.to_string(),
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Playing a track that probed as available.
    pub fn is_active(&self) -> bool {
        self.playback == PlaybackState::Playing && self.current_valid
    }

    pub(super) fn sync_track_name(&mut self) {
        self.track_name = self
            .current_track()
            .map_or_else(|| NO_AUDIO_LOADED.to_string(), |t| t.name.clone());
    }

    /// Point `current` at the first track, or at nothing when the list is empty.
    pub(super) fn reset_current(&mut self) {
        self.current = if self.tracks.is_empty() { None } else { Some(0) };
    }
}
