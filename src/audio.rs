//! Audio output: a dedicated rodio thread behind the `MediaBackend` seam,
//! source resolution, the blob store for uploads and the frequency analyser.

mod analyser;
mod backend;
mod blob;
mod error;
mod player;
mod resolve;
mod sink;
mod thread;
mod types;

pub use analyser::{Analyser, AnalyserSource, BIN_COUNT, FFT_SIZE};
pub use backend::MediaBackend;
pub use blob::{BlobStore, is_blob_uri};
pub use error::MediaError;
pub use player::AudioPlayer;
pub use resolve::{MediaResolver, MediaSource};

#[cfg(test)]
mod tests;
