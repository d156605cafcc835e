use std::path::PathBuf;
use std::process::ExitStatus;

/// Result alias carrying the crate error type.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failure taxonomy for the generation pipeline. Every stage is attempted
/// exactly once; a failure aborts the run and surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The input could not be probed or decoded (missing file, unsupported
    /// container, broken stream).
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("no supported audio track in input")]
    NoAudioTrack,

    #[error("input decoded to zero samples")]
    EmptyAudio,

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("ffmpeg not found on PATH; install ffmpeg to encode video")]
    FfmpegMissing,

    /// ffmpeg exited nonzero. Carries the tail of its stderr for diagnosis.
    #[error("ffmpeg exited with {status}:\n{stderr}")]
    Encode { status: ExitStatus, stderr: String },
}

impl PipelineError {
    pub(crate) fn decode(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
