//! Creating `rodio` sinks from resolved sources.

use rodio::{OutputStream, Sink};

use super::analyser::{Analyser, AnalyserSource};
use super::error::MediaError;
use super::resolve::MediaSource;

/// Create a paused `Sink` playing `source` from the start, tapped by `analyser`
/// when one is attached.
pub(super) fn create_sink(
    stream: &OutputStream,
    source: &MediaSource,
    analyser: Option<&Analyser>,
    volume: f32,
) -> Result<Sink, MediaError> {
    let sink = Sink::connect_new(stream.mixer());
    sink.pause();
    sink.set_volume(volume);
    append_source(&sink, source, analyser)?;
    Ok(sink)
}

/// Queue another pass of `source` on `sink`.
pub(super) fn append_source(
    sink: &Sink,
    source: &MediaSource,
    analyser: Option<&Analyser>,
) -> Result<(), MediaError> {
    let decoded = source.open()?;
    match analyser {
        Some(a) => sink.append(AnalyserSource::new(decoded, a.clone())),
        None => sink.append(decoded),
    }
    Ok(())
}
