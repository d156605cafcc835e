use lofty::prelude::*;
use lofty::read_from_path;
use serde::Serialize;
use std::path::Path;

const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_ARTIST: &str = "Unknown Artist";
const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Title/artist/album read once per run. Missing individual fields fall
/// back to placeholders; a file with no tag container at all is *not* an
/// error for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl Default for TrackMetadata {
    fn default() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            album: UNKNOWN_ALBUM.to_string(),
        }
    }
}

impl TrackMetadata {
    /// The literal three-line block drawn at the bottom of the video.
    pub fn overlay_text(&self) -> String {
        format!(
            "Title: {}\nArtist: {}\nAlbum: {}",
            self.title, self.artist, self.album
        )
    }
}

/// Raised only when lofty cannot read the file at all. "No tags" is handled
/// by defaulting, so callers can tell a corrupt file from an untagged one.
#[derive(Debug, thiserror::Error)]
#[error("failed to read tags: {0}")]
pub struct TagError(#[from] lofty::error::LoftyError);

/// Reads title/artist/album with placeholder fallbacks.
pub fn read_track_metadata<P: AsRef<Path>>(path: P) -> Result<TrackMetadata, TagError> {
    let tagged_file = read_from_path(path.as_ref())?;

    let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
        return Ok(TrackMetadata::default());
    };

    Ok(TrackMetadata {
        title: tag
            .title()
            .map(|s| s.to_string())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        artist: tag
            .artist()
            .map(|s| s.to_string())
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
        album: tag
            .album()
            .map(|s| s.to_string())
            .unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_untagged_wav(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("untagged.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..8_000 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    #[test]
    fn untagged_file_yields_exact_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_untagged_wav(dir.path());

        let meta = read_track_metadata(&path).unwrap();
        assert_eq!(meta.title, "Unknown Title");
        assert_eq!(meta.artist, "Unknown Artist");
        assert_eq!(meta.album, "Unknown Album");
    }

    #[test]
    fn missing_file_is_a_tag_error() {
        let result = read_track_metadata("/nonexistent/file.mp3");
        assert!(result.is_err());
    }

    #[test]
    fn overlay_text_is_three_lines() {
        let meta = TrackMetadata {
            title: "Song".into(),
            artist: "Band".into(),
            album: "LP".into(),
        };
        assert_eq!(meta.overlay_text(), "Title: Song\nArtist: Band\nAlbum: LP");
    }
}
