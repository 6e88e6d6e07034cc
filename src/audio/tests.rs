use std::f32::consts::PI;
use std::time::Duration;

use rodio::Source;

use super::*;

/// A test source that produces a fixed sequence of samples.
struct TestSource {
    samples: Vec<f32>,
    pos: usize,
    sample_rate: u32,
    channels: u16,
}

impl TestSource {
    fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        TestSource {
            samples,
            pos: 0,
            sample_rate,
            channels,
        }
    }
}

impl Iterator for TestSource {
    type Item = f32;
    fn next(&mut self) -> Option<f32> {
        let s = self.samples.get(self.pos).copied()?;
        self.pos += 1;
        Some(s)
    }
}

impl Source for TestSource {
    fn current_span_len(&self) -> Option<usize> {
        Some(self.samples.len() - self.pos)
    }
    fn channels(&self) -> u16 {
        self.channels
    }
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// A sine whose period fits the analysis frame exactly `cycles` times.
fn bin_aligned_sine(cycles: usize) -> Vec<f32> {
    (0..FFT_SIZE)
        .map(|n| (2.0 * PI * cycles as f32 * n as f32 / FFT_SIZE as f32).sin())
        .collect()
}

/// Minimal 16-bit mono PCM WAV file.
fn wav_bytes(samples: &[i16]) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32;
    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&8000u32.to_le_bytes());
    out.extend_from_slice(&16000u32.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

#[test]
fn analyser_source_passes_samples_unchanged() {
    let original = vec![0.1, 0.2, -0.3, 0.4, 0.5, -0.6];
    let source = TestSource::new(original.clone(), 1000, 2);
    let wrapped = AnalyserSource::new(source, Analyser::new());
    let output: Vec<f32> = wrapped.collect();
    assert_eq!(output, original);
}

#[test]
fn analyser_source_preserves_source_properties() {
    let source = TestSource::new(vec![0.0; 50], 44100, 2);
    let wrapped = AnalyserSource::new(source, Analyser::new());
    assert_eq!(wrapped.sample_rate(), 44100);
    assert_eq!(wrapped.channels(), 2);
}

#[test]
fn silence_yields_empty_spectrum() {
    let analyser = Analyser::new();
    let source = TestSource::new(vec![0.0; FFT_SIZE], 44100, 1);
    let _: Vec<f32> = AnalyserSource::new(source, analyser.clone()).collect();

    let bins = analyser.frequency_data();
    assert_eq!(bins.len(), BIN_COUNT);
    assert!(bins.iter().all(|&b| b == 0));
}

#[test]
fn sine_peaks_in_its_own_bin() {
    let analyser = Analyser::new();
    let source = TestSource::new(bin_aligned_sine(8), 44100, 1);
    let _: Vec<f32> = AnalyserSource::new(source, analyser.clone()).collect();

    let bins = analyser.frequency_data();
    assert_eq!(bins[8], 255);
    assert_eq!(bins[64], 0);
    let peak = bins.iter().enumerate().max_by_key(|&(_, b)| *b).map(|(i, _)| i);
    assert!(matches!(peak, Some(6..=10)), "peak at {peak:?}");
}

#[test]
fn stereo_frames_are_downmixed() {
    // Left and right cancel out, so the analyser hears silence.
    let samples: Vec<f32> = bin_aligned_sine(8).into_iter().flat_map(|s| [s, -s]).collect();
    let analyser = Analyser::new();
    let _: Vec<f32> = AnalyserSource::new(TestSource::new(samples, 44100, 2), analyser.clone()).collect();

    assert!(analyser.frequency_data().iter().all(|&b| b == 0));
}

#[test]
fn blob_store_registers_and_releases() {
    let blobs = BlobStore::new();
    let uri = blobs.register("custom-1", vec![1, 2, 3]);
    assert_eq!(uri, "blob:jukon/custom-1");
    assert!(is_blob_uri(&uri));
    assert_eq!(blobs.get(&uri).as_deref(), Some(&[1u8, 2, 3][..]));

    assert!(blobs.release(&uri));
    assert!(!blobs.release(&uri));
    assert_eq!(blobs.len(), 0);
}

#[test]
fn resolver_maps_site_paths_under_asset_root() {
    let resolver = MediaResolver::new("/srv/public", BlobStore::new());
    assert_eq!(
        resolver.asset_path("/music/demo1.mp3"),
        std::path::PathBuf::from("/srv/public/music/demo1.mp3")
    );
    assert!(matches!(
        resolver.resolve("music/demo1.mp3"),
        Ok(MediaSource::File(p)) if p.ends_with("music/demo1.mp3")
    ));
}

#[test]
fn resolver_rejects_unknown_blobs() {
    let resolver = MediaResolver::new("/srv/public", BlobStore::new());
    assert!(matches!(
        resolver.resolve("blob:jukon/gone"),
        Err(MediaError::UnknownBlob(_))
    ));
    assert!(!resolver.probe("blob:jukon/gone"));
}

#[test]
fn probe_requires_a_decodable_source() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("music")).unwrap();
    std::fs::write(dir.path().join("music/bad.mp3"), b"definitely not audio").unwrap();
    std::fs::write(dir.path().join("music/tone.wav"), wav_bytes(&[0, 1000, -1000, 0].repeat(64))).unwrap();

    let blobs = BlobStore::new();
    let resolver = MediaResolver::new(dir.path(), blobs.clone());
    assert!(!resolver.probe("/music/missing.mp3"));
    assert!(!resolver.probe("/music/bad.mp3"));
    assert!(resolver.probe("/music/tone.wav"));

    let uri = blobs.register("custom-1", wav_bytes(&[0; 256]));
    assert!(resolver.probe(&uri));
}
