use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::analyser::Analyser;
use super::error::MediaError;
use super::resolve::{MediaResolver, MediaSource};
use super::sink::{append_source, create_sink};
use super::types::AudioCmd;

/// Everything the audio thread owns between commands.
struct Deck {
    stream: Option<OutputStream>,
    resolver: MediaResolver,
    src: Option<String>,
    source: Option<MediaSource>,
    sink: Option<Sink>,
    playing: bool,
    volume: f32,
    analyser: Option<Analyser>,
}

impl Deck {
    fn stop_output(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.playing = false;
    }

    fn load(&mut self, src: String) {
        self.stop_output();
        self.source = match self.resolver.resolve(&src) {
            Ok(source) => Some(source),
            Err(e) => {
                log::warn!("failed to load {src}: {e}");
                None
            }
        };
        self.src = Some(src);
    }

    fn play(&mut self) -> Result<(), MediaError> {
        let Some(stream) = self.stream.as_ref() else {
            return Err(MediaError::NoOutput);
        };
        if self.sink.is_none() {
            // A failed load is retried so a source that appeared since can play.
            if self.source.is_none() {
                let src = self.src.as_deref().ok_or(MediaError::NoSource)?;
                self.source = Some(self.resolver.resolve(src)?);
            }
            let source = self.source.as_ref().ok_or(MediaError::NoSource)?;
            self.sink = Some(create_sink(stream, source, self.analyser.as_ref(), self.volume)?);
        }
        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        self.playing = false;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }

    fn attach(&mut self, analyser: Analyser) {
        self.analyser = Some(analyser);
        // Rebuild an untapped sink; it is attached before the first play, so
        // nothing has been heard from it yet.
        if let (Some(stream), Some(source)) = (self.stream.as_ref(), self.source.as_ref()) {
            if self.sink.is_some() && !self.playing {
                if let Some(old) = self.sink.take() {
                    old.stop();
                }
                match create_sink(stream, source, self.analyser.as_ref(), self.volume) {
                    Ok(sink) => self.sink = Some(sink),
                    Err(e) => log::warn!("failed to rebuild sink for analysis: {e}"),
                }
            }
        }
    }

    /// Sources loop: queue another pass when the current one ran out.
    fn refill(&mut self) {
        if !self.playing {
            return;
        }
        let (Some(sink), Some(source)) = (self.sink.as_ref(), self.source.as_ref()) else {
            return;
        };
        if sink.empty() {
            if let Err(e) = append_source(sink, source, self.analyser.as_ref()) {
                log::warn!("failed to loop source: {e}");
                self.stop_output();
            }
        }
    }
}

fn open_output() -> Option<OutputStream> {
    match OutputStreamBuilder::open_default_stream() {
        Ok(mut stream) => {
            // rodio logs to stderr when OutputStream is dropped, which would
            // scribble over the TUI.
            stream.log_on_drop(false);
            Some(stream)
        }
        Err(e) => {
            log::error!("no audio output device: {e}");
            None
        }
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    resolver: MediaResolver,
    volume: f32,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut deck = Deck {
            stream: open_output(),
            resolver,
            src: None,
            source: None,
            sink: None,
            playing: false,
            volume,
            analyser: None,
        };

        loop {
            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load(src) => deck.load(src),
                    AudioCmd::Play(reply) => {
                        let result = deck.play();
                        if let Err(e) = &result {
                            log::warn!("play rejected: {e}");
                        }
                        let _ = reply.send(result);
                    }
                    AudioCmd::Pause => deck.pause(),
                    AudioCmd::Stop => deck.stop_output(),
                    AudioCmd::SetVolume(v) => deck.set_volume(v),
                    AudioCmd::AttachAnalyser(a) => deck.attach(a),
                    AudioCmd::Quit => {
                        deck.stop_output();
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => deck.refill(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
