pub mod onset;
pub mod tempo;

use serde::Serialize;

use crate::audio::AudioTrack;
use onset::OnsetExtractor;

/// Estimated global tempo plus the detected beat timestamps (seconds,
/// ascending). May be empty for silence or material with no clear pulse.
#[derive(Debug, Clone, Serialize)]
pub struct BeatAnalysis {
    pub tempo_bpm: Option<f32>,
    pub beats: Vec<f32>,
    pub duration_seconds: f32,
}

/// Runs the full beat locator: spectral-flux onset envelope, autocorrelation
/// tempo estimate, then peak picking at the estimated period.
pub fn analyze_beats(track: &AudioTrack) -> BeatAnalysis {
    let extractor = OnsetExtractor::new(track.sample_rate);
    let envelope = extractor.onset_envelope(&track.samples);
    let fps = extractor.frames_per_second();

    let tempo_bpm = tempo::estimate_tempo(&envelope, fps);
    let beats = match tempo_bpm {
        Some(bpm) => tempo::pick_beats(&envelope, fps, 60.0 / bpm),
        None => Vec::new(),
    };

    BeatAnalysis {
        tempo_bpm,
        beats,
        duration_seconds: track.duration_seconds(),
    }
}
