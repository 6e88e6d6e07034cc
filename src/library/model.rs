use serde::{Deserialize, Serialize};

/// Id prefix reserved for built-in tracks.
pub const BUILTIN_ID_PREFIX: &str = "default-";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TrackOrigin {
    /// Shipped with the player; never removable.
    BuiltIn,
    /// Uploaded by an admin and persisted in local storage.
    #[default]
    Custom,
    /// Discovered through the remote directory listing.
    Remote,
}

/// A playable entry. Only `id`, `name` and `src` are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub src: String,
    #[serde(skip)]
    pub origin: TrackOrigin,
}

impl Track {
    pub fn new(id: impl Into<String>, name: impl Into<String>, src: impl Into<String>, origin: TrackOrigin) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            src: src.into(),
            origin,
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.origin == TrackOrigin::BuiltIn || is_builtin_id(&self.id)
    }
}

pub fn is_builtin_id(id: &str) -> bool {
    id.starts_with(BUILTIN_ID_PREFIX)
}

/// Built-in tracks from `(name, src)` pairs, numbered `default-1`, `default-2`, ...
pub fn builtin_tracks<'a>(defaults: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<Track> {
    defaults
        .into_iter()
        .enumerate()
        .map(|(i, (name, src))| {
            Track::new(
                format!("{BUILTIN_ID_PREFIX}{}", i + 1),
                name,
                src,
                TrackOrigin::BuiltIn,
            )
        })
        .collect()
}

/// Ordered track list: unique ids, built-ins first.
#[derive(Debug, Clone, Default)]
pub struct TrackList {
    tracks: Vec<Track>,
}

impl TrackList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from `tracks`, dropping entries whose id is already present.
    /// Built-ins are moved to the front; relative order is otherwise kept.
    pub fn from_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut list = Self::new();
        for track in tracks {
            if let Err(dup) = list.push(track) {
                log::warn!("dropping track with duplicate id {:?}", dup.id);
            }
        }
        list
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Append `track` (built-ins go after the last built-in). Returns its index.
    ///
    /// Rejects the track when its id is already taken.
    pub fn push(&mut self, track: Track) -> Result<usize, Track> {
        if self.contains(&track.id) {
            return Err(track);
        }
        if track.is_builtin() {
            let at = self.tracks.iter().take_while(|t| t.is_builtin()).count();
            self.tracks.insert(at, track);
            Ok(at)
        } else {
            self.tracks.push(track);
            Ok(self.tracks.len() - 1)
        }
    }

    /// Remove a non-built-in track by index.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        match self.tracks.get(index) {
            Some(t) if !t.is_builtin() => Some(self.tracks.remove(index)),
            _ => None,
        }
    }

    /// The mutable subset (everything that is not built-in).
    pub fn custom(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| !t.is_builtin())
    }
}
