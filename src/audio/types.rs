//! Commands understood by the audio thread.

use std::sync::mpsc::Sender;

use super::analyser::Analyser;
use super::error::MediaError;

pub type PlayReply = Sender<Result<(), MediaError>>;

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the current source with `src`, paused at the start.
    Load(String),
    /// Start or resume output; the outcome is sent back on the reply channel.
    Play(PlayReply),
    /// Pause output, keeping the position.
    Pause,
    /// Stop output and rewind to the start of the loaded source.
    Stop,
    /// Set the output gain in `[0, 1]`.
    SetVolume(f32),
    /// Tap all subsequent output into the analyser.
    AttachAnalyser(Analyser),
    /// Stop output and exit the audio thread.
    Quit,
}
