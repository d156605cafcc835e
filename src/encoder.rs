use std::ffi::OsString;
use std::fmt::Write as _;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{PipelineError, Result};
use crate::timeline::{SegmentKind, VideoTimeline};

/// One ffmpeg invocation: the timeline's segments become an ffconcat clip
/// list over the two precomposed frames, the original audio is muxed in,
/// and the metadata block is drawn via drawtext.
pub struct EncodeJob<'a> {
    pub timeline: &'a VideoTimeline,
    pub base_frame: &'a Path,
    pub pulse_frame: &'a Path,
    pub audio_path: &'a Path,
    pub overlay_textfile: &'a Path,
    pub output_path: &'a Path,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
}

/// Probes for an ffmpeg binary on PATH before any work is done.
pub fn ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

impl EncodeJob<'_> {
    /// ffconcat script text: one file/duration pair per segment. The final
    /// image is repeated without a duration (concat demuxer convention) so
    /// the last segment's duration is honored.
    pub fn concat_script(&self) -> String {
        let mut script = String::from("ffconcat version 1.0\n");
        let mut last = self.base_frame;
        for seg in &self.timeline.segments {
            let frame = match seg.kind {
                SegmentKind::Identity => self.base_frame,
                SegmentKind::Pulse => self.pulse_frame,
            };
            writeln!(script, "file '{}'", frame.display()).unwrap();
            writeln!(script, "duration {:.6}", seg.length()).unwrap();
            last = frame;
        }
        writeln!(script, "file '{}'", last.display()).unwrap();
        script
    }

    /// Full argv (minus the program name). The overlay text comes from a
    /// file rather than an inline drawtext string, so metadata never needs
    /// filter-grammar escaping.
    pub fn ffmpeg_args(&self, script_path: &Path) -> Vec<OsString> {
        let filter = format!(
            "fps={},scale={}:{},drawtext=textfile='{}':fontcolor=white:fontsize={}:\
             x=(w-text_w)/2:y=h-text_h-{}",
            self.fps,
            self.width,
            self.height,
            self.overlay_textfile.display(),
            self.font_size,
            self.font_size,
        );

        let mut args: Vec<OsString> = Vec::new();
        for a in ["-y", "-f", "concat", "-safe", "0", "-i"] {
            args.push(a.into());
        }
        args.push(script_path.as_os_str().into());
        args.push("-i".into());
        args.push(self.audio_path.as_os_str().into());
        for a in [
            "-vf",
            filter.as_str(),
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            "aac",
            "-shortest",
        ] {
            args.push(a.into());
        }
        args.push(self.output_path.as_os_str().into());
        args
    }

    /// Writes the concat script and runs ffmpeg, mapping a nonzero exit to
    /// a typed error carrying the stderr tail.
    pub fn run(&self, script_path: &Path) -> Result<()> {
        if !ffmpeg_available() {
            return Err(PipelineError::FfmpegMissing);
        }

        std::fs::write(script_path, self.concat_script())?;

        let output = Command::new("ffmpeg")
            .args(self.ffmpeg_args(script_path))
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(12)..].join("\n");
            return Err(PipelineError::Encode {
                status: output.status,
                stderr: tail,
            });
        }
        Ok(())
    }
}
