use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{PipelineError, Result};

/// A fully decoded mono track. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct AudioTrack {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioTrack {
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decodes an mp3/wav file to a mono f32 buffer at its native sample rate.
///
/// Multi-channel input is averaged to mono. Corrupt packets are skipped
/// (streams often recover); EOF ends decoding.
pub fn decode_audio<P: AsRef<Path>>(path: P) -> Result<AudioTrack> {
    let path = path.as_ref();
    let src = File::open(path).map_err(|e| PipelineError::decode(path, e))?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| PipelineError::decode(path, e))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(PipelineError::NoAudioTrack)?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| PipelineError::decode(path, e))?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // Symphonia signals EOF through an IO error.
            Err(SymphoniaError::IoError(_)) => break,
            Err(e) => return Err(PipelineError::decode(path, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);

                let interleaved = buf.samples();
                let channels = spec.channels.count();
                if channels <= 1 {
                    samples.extend_from_slice(interleaved);
                } else {
                    // Interleaved multi-channel -> average to mono.
                    for frame in interleaved.chunks(channels) {
                        let sum: f32 = frame.iter().sum();
                        samples.push(sum / channels as f32);
                    }
                }
            }
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(SymphoniaError::IoError(_)) => break,
            Err(e) => return Err(PipelineError::decode(path, e)),
        }
    }

    if samples.is_empty() || sample_rate == 0 {
        return Err(PipelineError::EmptyAudio);
    }

    Ok(AudioTrack {
        samples,
        sample_rate,
    })
}
