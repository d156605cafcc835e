//! Renders the intermediate images to the current directory for eyeballing:
//! background gradient, waveform plot, composed base frame, pulse frame.
//!
//! Usage: verify_frames [audio_file]
//! Without an audio file, a synthetic 440 Hz sine is used for the waveform.

use anyhow::Result;
use beatframe::{audio::decode_audio, visuals, AudioTrack, RenderSettings};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let settings = RenderSettings::default();

    let track = if args.len() > 1 {
        decode_audio(&args[1])?
    } else {
        println!("No audio file given, using a synthetic 440 Hz sine.");
        let sample_rate = 22_050u32;
        let samples: Vec<f32> = (0..sample_rate * 5)
            .map(|n| {
                let t = n as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * 440.0 * t).sin() * (1.0 - t / 5.0)
            })
            .collect();
        AudioTrack {
            samples,
            sample_rate,
        }
    };

    let background = visuals::generate_gradient(settings.width, settings.height, settings.theme);
    let waveform = visuals::render_waveform(
        &track.samples,
        settings.waveform_width,
        settings.waveform_height,
    );
    let base = visuals::compose_base(&background, &waveform);
    let pulse = visuals::pulse_frame(&base, settings.brighten, settings.crop_ratio);

    background.save("background.png")?;
    waveform.save("waveform.png")?;
    base.save("base.png")?;
    pulse.save("pulse.png")?;

    println!("Wrote background.png, waveform.png, base.png, pulse.png");
    Ok(())
}
