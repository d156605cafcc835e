//! Headless check of the decode -> beat analysis -> timeline stages.
//!
//! Usage: verify_analysis <audio_file> [--json]

use anyhow::Result;
use beatframe::{analysis, audio::decode_audio, RenderSettings, VideoTimeline};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: verify_analysis <audio_file> [--json]");
        std::process::exit(1);
    }
    let audio_path = &args[1];
    let as_json = args.iter().any(|a| a == "--json");

    println!("Decoding {audio_path}...");
    let track = decode_audio(audio_path)?;
    println!(
        "Decoded {} samples at {} Hz ({:.2}s)",
        track.samples.len(),
        track.sample_rate,
        track.duration_seconds()
    );

    let beat_analysis = analysis::analyze_beats(&track);
    match beat_analysis.tempo_bpm {
        Some(bpm) => println!("Estimated tempo: {bpm:.1} BPM"),
        None => println!("No clear tempo detected"),
    }
    println!("Beats: {}", beat_analysis.beats.len());
    for (i, beat) in beat_analysis.beats.iter().take(10).enumerate() {
        println!("  beat {i}: {beat:.3}s");
    }

    let settings = RenderSettings::default();
    let timeline = VideoTimeline::from_beats(
        &beat_analysis.beats,
        beat_analysis.duration_seconds,
        settings.effect_window,
    );
    println!(
        "Timeline: {} segments ({} pulses, {} beats dropped)",
        timeline.segments.len(),
        timeline.pulse_count(),
        timeline.dropped_beats
    );

    if as_json {
        println!("{}", serde_json::to_string_pretty(&beat_analysis)?);
    }
    Ok(())
}
