//! Persistence of the custom-track subset.

use crate::storage::{Storage, StorageError};

use super::model::{Track, TrackOrigin};

pub const CUSTOM_TRACKS_KEY: &str = "jukon-custom-tracks";

/// Read persisted custom tracks. A malformed entry is logged and treated as empty.
pub fn load_custom_tracks(storage: &impl Storage) -> Vec<Track> {
    let Some(text) = storage.get(CUSTOM_TRACKS_KEY) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<Track>>(&text) {
        Ok(tracks) => tracks
            .into_iter()
            .filter(|t| {
                if t.is_builtin() {
                    log::warn!("ignoring persisted track with reserved id {:?}", t.id);
                    false
                } else {
                    true
                }
            })
            .map(|t| Track {
                origin: TrackOrigin::Custom,
                ..t
            })
            .collect(),
        Err(e) => {
            log::error!("error loading saved tracks: {e}");
            Vec::new()
        }
    }
}

/// Persist `tracks` as a JSON array of `{id, name, src}`.
pub fn save_custom_tracks<'a>(
    storage: &mut impl Storage,
    tracks: impl IntoIterator<Item = &'a Track>,
) -> Result<(), StorageError> {
    let tracks: Vec<&Track> = tracks.into_iter().collect();
    // Serializing plain strings cannot fail.
    let text = serde_json::to_string(&tracks).unwrap_or_else(|_| "[]".to_string());
    storage.set(CUSTOM_TRACKS_KEY, text)
}
