//! Amplitude visualizer: a decorative idle animation, or the live spectrum
//! once the analyser is attached and playback is running.

use std::time::Duration;

use crate::audio::Analyser;

pub const IDLE_BARS: usize = 32;
/// Height of the idle canvas the bar heights are expressed in.
pub const IDLE_CANVAS_HEIGHT: f64 = 50.0;
/// Spectrum bars never exceed this share of the canvas.
const SPECTRUM_SCALE: f64 = 0.8;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VisualMode {
    Idle,
    Spectrum,
}

/// One rendered frame. Bar heights are fractions of the canvas in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub mode: VisualMode,
    pub bars: Vec<f64>,
    pub dimmed: bool,
}

/// Idle bar heights in canvas units at `t_ms` milliseconds.
pub fn idle_heights(t_ms: f64) -> Vec<f64> {
    (0..IDLE_BARS)
        .map(|i| (t_ms * 0.005 + i as f64 * 0.5).sin() * 15.0 + 20.0)
        .collect()
}

/// Spectrum bar heights as canvas fractions, one per frequency bin.
pub fn spectrum_heights(bins: &[u8]) -> Vec<f64> {
    bins.iter()
        .map(|&b| b as f64 / 255.0 * SPECTRUM_SCALE)
        .collect()
}

#[derive(Debug, Default)]
pub struct Visualizer {
    running: bool,
    analyser: Option<Analyser>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// End the render loop; no frames are produced afterwards.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn attach(&mut self, analyser: Analyser) {
        self.analyser = Some(analyser);
    }

    /// Render the frame for `elapsed` since start.
    ///
    /// `playing` selects the spectrum when an analyser is attached; `active`
    /// (playing a valid track) keeps the idle animation at full brightness.
    pub fn frame(&self, elapsed: Duration, playing: bool, active: bool) -> Option<Frame> {
        if !self.running {
            return None;
        }
        match (&self.analyser, playing) {
            (Some(analyser), true) => Some(Frame {
                mode: VisualMode::Spectrum,
                bars: spectrum_heights(&analyser.frequency_data()),
                dimmed: false,
            }),
            _ => Some(Frame {
                mode: VisualMode::Idle,
                bars: idle_heights(elapsed.as_secs_f64() * 1000.0)
                    .into_iter()
                    .map(|h| h / IDLE_CANVAS_HEIGHT)
                    .collect(),
                dimmed: !active,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::BIN_COUNT;

    #[test]
    fn idle_heights_follow_the_wave() {
        let h = idle_heights(0.0);
        assert_eq!(h.len(), IDLE_BARS);
        assert!((h[0] - 20.0).abs() < 1e-9);
        assert!((h[1] - (0.5f64.sin() * 15.0 + 20.0)).abs() < 1e-9);
        assert!(idle_heights(1234.0).iter().all(|&v| (5.0..=35.0).contains(&v)));
    }

    #[test]
    fn spectrum_heights_scale_bytes() {
        assert_eq!(spectrum_heights(&[0, 255]), vec![0.0, 0.8]);
    }

    #[test]
    fn idle_frame_is_dimmed_unless_active() {
        let mut v = Visualizer::new();
        assert!(v.frame(Duration::ZERO, false, false).is_none());

        v.start();
        let frame = v.frame(Duration::from_millis(100), false, false).unwrap();
        assert_eq!(frame.mode, VisualMode::Idle);
        assert!(frame.dimmed);
        assert!(!v.frame(Duration::ZERO, true, true).unwrap().dimmed);
    }

    #[test]
    fn spectrum_needs_analyser_and_playback() {
        let mut v = Visualizer::new();
        v.start();
        v.attach(Analyser::new());

        let frame = v.frame(Duration::ZERO, true, true).unwrap();
        assert_eq!(frame.mode, VisualMode::Spectrum);
        assert_eq!(frame.bars.len(), BIN_COUNT);
        assert_eq!(v.frame(Duration::ZERO, false, false).unwrap().mode, VisualMode::Idle);

        v.stop();
        assert!(v.frame(Duration::ZERO, true, true).is_none());
    }
}
