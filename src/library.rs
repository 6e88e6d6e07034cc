//! Track library: the track model, the ordered track list, persistence of
//! admin uploads and the remote directory listing.

mod files;
mod listing;
mod model;
mod persist;

pub use files::{is_audio_file, track_name_from_file};
pub use listing::{HttpListing, ListingEntry, ListingError, ListingSource, parse_listing, tracks_from_listing};
pub use model::*;
pub use persist::{CUSTOM_TRACKS_KEY, load_custom_tracks, save_custom_tracks};

#[cfg(test)]
mod tests;
