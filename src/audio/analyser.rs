use rodio::Source;
use std::f64::consts::PI;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Number of time-domain samples per analysis frame.
pub const FFT_SIZE: usize = 256;
/// Number of frequency bins reported per frame.
pub const BIN_COUNT: usize = FFT_SIZE / 2;

const MIN_DECIBELS: f64 = -100.0;
const MAX_DECIBELS: f64 = -30.0;
// Mono frames buffered by the source before publishing to the shared ring.
const FLUSH_FRAMES: usize = 64;

struct Ring {
    samples: [f32; FFT_SIZE],
    pos: usize,
}

/// Frequency analysis over the most recent down-mixed samples.
/// Fed by `AnalyserSource` on the audio thread, read by the UI thread.
#[derive(Clone)]
pub struct Analyser {
    ring: Arc<Mutex<Ring>>,
}

impl std::fmt::Debug for Analyser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Analyser")
    }
}

impl Default for Analyser {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyser {
    pub fn new() -> Self {
        Analyser {
            ring: Arc::new(Mutex::new(Ring {
                samples: [0.0; FFT_SIZE],
                pos: 0,
            })),
        }
    }

    fn push(&self, frames: &[f32]) {
        let mut ring = match self.ring.lock() {
            Ok(r) => r,
            Err(poisoned) => poisoned.into_inner(),
        };
        for &s in frames {
            let pos = ring.pos;
            ring.samples[pos] = s;
            ring.pos = (pos + 1) % FFT_SIZE;
        }
    }

    /// The last `FFT_SIZE` samples, oldest first.
    fn snapshot(&self) -> [f32; FFT_SIZE] {
        let ring = match self.ring.lock() {
            Ok(r) => r,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut out = [0.0; FFT_SIZE];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = ring.samples[(ring.pos + i) % FFT_SIZE];
        }
        out
    }

    /// Byte-scaled magnitude per frequency bin.
    ///
    /// Samples are Blackman-windowed, transformed, and each bin's magnitude in
    /// decibels is mapped linearly from [-100, -30] dB onto [0, 255].
    pub fn frequency_data(&self) -> Vec<u8> {
        let samples = self.snapshot();
        let n = FFT_SIZE as f64;

        let windowed: Vec<f64> = samples
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let x = i as f64 / n;
                let w = 0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos();
                s as f64 * w
            })
            .collect();

        (0..BIN_COUNT)
            .map(|k| {
                let (mut re, mut im) = (0.0, 0.0);
                for (i, &x) in windowed.iter().enumerate() {
                    let phase = 2.0 * PI * (k * i) as f64 / n;
                    re += x * phase.cos();
                    im -= x * phase.sin();
                }
                let magnitude = (re * re + im * im).sqrt() / n;
                let db = 20.0 * magnitude.log10();
                let scaled = 255.0 * (db - MIN_DECIBELS) / (MAX_DECIBELS - MIN_DECIBELS);
                scaled.clamp(0.0, 255.0) as u8
            })
            .collect()
    }
}

/// A Source wrapper that feeds an `Analyser` with mono frames.
/// Passes all samples through unchanged.
pub struct AnalyserSource<S> {
    inner: S,
    analyser: Analyser,
    frame_sum: f32,
    frame_pos: u16,
    pending: Vec<f32>,
}

impl<S> AnalyserSource<S>
where
    S: Source,
{
    pub fn new(source: S, analyser: Analyser) -> Self {
        AnalyserSource {
            inner: source,
            analyser,
            frame_sum: 0.0,
            frame_pos: 0,
            pending: Vec::with_capacity(FLUSH_FRAMES),
        }
    }
}

impl<S> Iterator for AnalyserSource<S>
where
    S: Source,
{
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let channels = self.inner.channels().max(1);
        let Some(sample) = self.inner.next() else {
            if !self.pending.is_empty() {
                self.analyser.push(&self.pending);
                self.pending.clear();
            }
            return None;
        };

        self.frame_sum += sample;
        self.frame_pos += 1;
        if self.frame_pos >= channels {
            self.pending.push(self.frame_sum / channels as f32);
            self.frame_sum = 0.0;
            self.frame_pos = 0;
            if self.pending.len() >= FLUSH_FRAMES {
                self.analyser.push(&self.pending);
                self.pending.clear();
            }
        }

        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S> Source for AnalyserSource<S>
where
    S: Source,
{
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}
