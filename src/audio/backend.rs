use super::analyser::Analyser;
use super::error::MediaError;

/// Media operations the player controller drives.
///
/// `probe` and `play` are async because they may wait on I/O or on the
/// output device; the rest only enqueue work.
#[allow(async_fn_in_trait)]
pub trait MediaBackend {
    /// Whether `src` can be opened and decoded. Never fails.
    async fn probe(&self, src: &str) -> bool;
    /// Make `src` the current source, paused at the start.
    fn load(&mut self, src: &str);
    async fn play(&mut self) -> Result<(), MediaError>;
    fn pause(&mut self);
    /// Pause and rewind to the start.
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    /// Route output through a frequency analyser.
    fn attach_analyser(&mut self) -> Result<Analyser, MediaError>;
    /// Keep uploaded bytes in memory; returns the `blob:` URI addressing them.
    fn register_blob(&mut self, id: &str, bytes: Vec<u8>) -> String;
    fn release_blob(&mut self, src: &str);
    /// Stop output and release the device.
    fn shutdown(&mut self);
}
