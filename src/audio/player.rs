use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use super::analyser::Analyser;
use super::backend::MediaBackend;
use super::blob::is_blob_uri;
use super::error::MediaError;
use super::resolve::MediaResolver;
use super::thread::spawn_audio_thread;
use super::types::AudioCmd;

/// How long a play request may wait on the audio thread (remote sources are
/// downloaded before they start).
const PLAY_TIMEOUT: Duration = Duration::from_secs(15);

/// Handle to the audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    resolver: MediaResolver,
    join: Option<JoinHandle<()>>,
}

impl AudioPlayer {
    pub fn new(resolver: MediaResolver, volume: f32) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let join = spawn_audio_thread(rx, resolver.clone(), volume);
        Self {
            tx,
            resolver,
            join: Some(join),
        }
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            log::warn!("audio thread is gone");
        }
    }
}

impl MediaBackend for AudioPlayer {
    async fn probe(&self, src: &str) -> bool {
        let ok = self.resolver.probe(src);
        log::debug!("probe {src} -> {ok}");
        ok
    }

    fn load(&mut self, src: &str) {
        self.send(AudioCmd::Load(src.to_string()));
    }

    async fn play(&mut self) -> Result<(), MediaError> {
        let (reply, rx) = mpsc::channel();
        self.tx
            .send(AudioCmd::Play(reply))
            .map_err(|_| MediaError::Disconnected)?;
        match rx.recv_timeout(PLAY_TIMEOUT) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(MediaError::Timeout),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(MediaError::Disconnected),
        }
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn stop(&mut self) {
        self.send(AudioCmd::Stop);
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(AudioCmd::SetVolume(volume));
    }

    fn attach_analyser(&mut self) -> Result<Analyser, MediaError> {
        let analyser = Analyser::new();
        self.tx
            .send(AudioCmd::AttachAnalyser(analyser.clone()))
            .map_err(|_| MediaError::Disconnected)?;
        Ok(analyser)
    }

    fn register_blob(&mut self, id: &str, bytes: Vec<u8>) -> String {
        self.resolver.blobs().register(id, bytes)
    }

    fn release_blob(&mut self, src: &str) {
        if is_blob_uri(src) && !self.resolver.blobs().release(src) {
            log::debug!("no blob stored for {src}");
        }
    }

    fn shutdown(&mut self) {
        let _ = self.tx.send(AudioCmd::Quit);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
