pub mod decoder;

pub use decoder::{decode_audio, AudioTrack};
