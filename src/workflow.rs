use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analysis;
use crate::audio::decode_audio;
use crate::encoder::EncodeJob;
use crate::error::Result;
use crate::metadata::{read_track_metadata, TrackMetadata};
use crate::timeline::VideoTimeline;
use crate::visuals;

/// Fixed render parameters. There is no CLI or environment surface; the
/// defaults are the product values, and the verify binaries can dump them.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub theme: [u8; 3],
    pub waveform_width: u32,
    pub waveform_height: u32,
    /// Pulse window anchored at each beat, seconds.
    pub effect_window: f32,
    pub brighten: f32,
    pub crop_ratio: f32,
    pub font_size: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: visuals::FRAME_WIDTH,
            height: visuals::FRAME_HEIGHT,
            fps: 30,
            theme: visuals::DEFAULT_THEME,
            waveform_width: 1200,
            waveform_height: 480,
            effect_window: 0.1,
            brighten: 1.5,
            crop_ratio: 0.9,
            font_size: 24,
        }
    }
}

/// Stage transitions surfaced to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Decoding,
    Analyzing,
    Rendering,
    Encoding,
    Done,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub duration_seconds: f32,
    pub tempo_bpm: Option<f32>,
    pub beat_count: usize,
    pub dropped_beats: usize,
    pub metadata: TrackMetadata,
    pub output: PathBuf,
}

pub struct VideoGenerator {
    settings: RenderSettings,
}

impl VideoGenerator {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Runs the whole pipeline, reporting stage transitions through the
    /// callback. Every stage is attempted once; the first failure aborts.
    pub fn generate<F>(
        &self,
        audio_path: &Path,
        output_path: &Path,
        mut progress: F,
    ) -> Result<GenerationReport>
    where
        F: FnMut(Progress),
    {
        let s = &self.settings;

        // 1. Decode
        progress(Progress::Decoding);
        info!(path = %audio_path.display(), "decoding audio");
        let track = decode_audio(audio_path)?;
        let duration = track.duration_seconds();

        // 2. Metadata. Unreadable tags are tolerated with defaults; the
        // typed TagError stays available for callers that care.
        let metadata = match read_track_metadata(audio_path) {
            Ok(meta) => meta,
            Err(e) => {
                warn!(error = %e, "tag read failed, using defaults");
                TrackMetadata::default()
            }
        };

        // 3. Beat analysis
        progress(Progress::Analyzing);
        let beat_analysis = analysis::analyze_beats(&track);
        info!(
            tempo_bpm = ?beat_analysis.tempo_bpm,
            beats = beat_analysis.beats.len(),
            "beat analysis complete"
        );

        // 4. Visuals. Background and waveform intermediates persist next to
        // the output; the composed frames live in the scratch dir.
        progress(Progress::Rendering);
        let background = visuals::generate_gradient(s.width, s.height, s.theme);
        let waveform =
            visuals::render_waveform(&track.samples, s.waveform_width, s.waveform_height);
        let base = visuals::compose_base(&background, &waveform);
        let pulse = visuals::pulse_frame(&base, s.brighten, s.crop_ratio);

        let out_dir = output_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        background.save(out_dir.join("background.png"))?;
        waveform.save(out_dir.join("waveform.png"))?;

        let scratch = scratch_dir()?;
        let base_path = scratch.join("base.png");
        let pulse_path = scratch.join("pulse.png");
        base.save(&base_path)?;
        pulse.save(&pulse_path)?;

        // 5. Timeline
        let timeline = VideoTimeline::from_beats(&beat_analysis.beats, duration, s.effect_window);
        if timeline.dropped_beats > 0 {
            warn!(
                dropped = timeline.dropped_beats,
                "beats inside an active pulse window were dropped"
            );
        }

        // 6. Encode
        progress(Progress::Encoding);
        let textfile = scratch.join("overlay.txt");
        fs::write(&textfile, metadata.overlay_text())?;
        let script = scratch.join("segments.ffconcat");

        let job = EncodeJob {
            timeline: &timeline,
            base_frame: &base_path,
            pulse_frame: &pulse_path,
            audio_path,
            overlay_textfile: &textfile,
            output_path,
            fps: s.fps,
            width: s.width,
            height: s.height,
            font_size: s.font_size,
        };
        debug!(script = %script.display(), "running ffmpeg");
        job.run(&script)?;

        // Scratch files are removed on success, left for inspection on
        // failure.
        let _ = fs::remove_dir_all(&scratch);

        progress(Progress::Done);
        info!(output = %output_path.display(), "video written");
        Ok(GenerationReport {
            duration_seconds: duration,
            tempo_bpm: beat_analysis.tempo_bpm,
            beat_count: beat_analysis.beats.len(),
            dropped_beats: timeline.dropped_beats,
            metadata,
            output: output_path.to_path_buf(),
        })
    }
}

fn scratch_dir() -> std::io::Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("beatframe-{}", std::process::id()));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    #[test]
    fn missing_input_fails_with_a_decode_error() {
        let generator = VideoGenerator::new(RenderSettings::default());
        let result = generator.generate(
            Path::new("/nonexistent/input.mp3"),
            Path::new("/tmp/out.mp4"),
            |_| {},
        );
        assert!(matches!(result, Err(PipelineError::Decode { .. })));
    }

    #[test]
    fn default_settings_carry_the_fixed_parameters() {
        let s = RenderSettings::default();
        assert_eq!((s.width, s.height), (1920, 1080));
        assert_eq!(s.theme, [0, 0, 255]);
        assert!((s.effect_window - 0.1).abs() < f32::EPSILON);
        assert!((s.brighten - 1.5).abs() < f32::EPSILON);
        assert!((s.crop_ratio - 0.9).abs() < f32::EPSILON);
    }
}
