//! Beatframe: renders a music-visualization video from an audio file.
//!
//! The pipeline decodes the track, detects beats, composes a gradient
//! background with a waveform plot, pulses the frame on each beat, overlays
//! the track metadata, and encodes the result with ffmpeg. A small desktop
//! form ([`app`]) drives it; the `verify_*` binaries exercise the stages
//! headlessly.

pub mod analysis;
pub mod app;
pub mod audio;
pub mod encoder;
pub mod error;
pub mod metadata;
pub mod timeline;
pub mod visuals;
pub mod workflow;

pub use analysis::BeatAnalysis;
pub use audio::AudioTrack;
pub use error::{PipelineError, Result};
pub use metadata::TrackMetadata;
pub use timeline::{Segment, SegmentKind, VideoTimeline};
pub use workflow::{GenerationReport, Progress, RenderSettings, VideoGenerator};

/// Starts the interactive shell.
pub fn run() -> eframe::Result<()> {
    app::run()
}
