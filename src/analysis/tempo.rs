/// Tempo search range. Lags outside 60-200 BPM are not considered.
pub const MIN_BPM: f32 = 60.0;
pub const MAX_BPM: f32 = 200.0;

/// Estimates the global tempo from an onset envelope by autocorrelation of
/// the mean-removed signal. Returns None for silence or envelopes too short
/// to cover a single beat period.
pub fn estimate_tempo(envelope: &[f32], fps: f32) -> Option<f32> {
    if envelope.len() < 4 {
        return None;
    }

    let mean = envelope.iter().sum::<f32>() / envelope.len() as f32;
    let centered: Vec<f32> = envelope.iter().map(|v| v - mean).collect();
    let energy: f32 = centered.iter().map(|v| v * v).sum();
    if energy <= f32::EPSILON {
        // Flat envelope: nothing periodic to find.
        return None;
    }

    let min_lag = (fps * 60.0 / MAX_BPM).round() as usize;
    let max_lag = ((fps * 60.0 / MIN_BPM).round() as usize).min(centered.len() - 1);
    if min_lag == 0 || min_lag >= max_lag {
        return None;
    }

    let mut best_lag = 0usize;
    let mut best_score = f32::MIN;
    for lag in min_lag..=max_lag {
        let mut acc = 0.0;
        for t in lag..centered.len() {
            acc += centered[t] * centered[t - lag];
        }
        if acc > best_score {
            best_score = acc;
            best_lag = lag;
        }
    }

    if best_score <= 0.0 {
        return None;
    }
    Some(60.0 * fps / best_lag as f32)
}

/// Picks beat timestamps from the envelope.
///
/// A frame is a beat candidate when it clears an adaptive threshold
/// (moving mean + half a moving std-dev over ~1s either side) and is the
/// maximum of its +/-3 frame neighborhood. A final pass enforces a minimum
/// separation of half the beat period, keeping the stronger peak.
pub fn pick_beats(envelope: &[f32], fps: f32, period_seconds: f32) -> Vec<f32> {
    let len = envelope.len();
    if len == 0 {
        return Vec::new();
    }

    let half_window = (fps.round() as usize).max(1);
    const POOL: usize = 3;

    let mut peaks: Vec<usize> = Vec::new();
    for i in 0..len {
        if envelope[i] <= 0.0 {
            continue;
        }

        let start = i.saturating_sub(half_window);
        let end = (i + half_window + 1).min(len);
        let local = &envelope[start..end];
        let mean = local.iter().sum::<f32>() / local.len() as f32;
        let var = local.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / local.len() as f32;
        if envelope[i] < mean + 0.5 * var.sqrt() {
            continue;
        }

        let ps = i.saturating_sub(POOL);
        let pe = (i + POOL + 1).min(len);
        if envelope[ps..pe].iter().any(|&v| v > envelope[i]) {
            continue;
        }
        peaks.push(i);
    }

    // Minimum-separation pass.
    let min_gap = ((period_seconds * 0.5 * fps).round() as usize).max(1);
    let mut kept: Vec<usize> = Vec::new();
    for &p in &peaks {
        match kept.last().copied() {
            Some(last) if p - last < min_gap => {
                if envelope[p] > envelope[last] {
                    *kept.last_mut().unwrap() = p;
                }
            }
            _ => kept.push(p),
        }
    }

    kept.iter().map(|&i| i as f32 / fps).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Envelope with impulses every `period` frames.
    fn impulse_envelope(frames: usize, period: usize) -> Vec<f32> {
        let mut env = vec![0.0f32; frames];
        let mut i = period;
        while i < frames {
            env[i] = 1.0;
            i += period;
        }
        env
    }

    #[test]
    fn periodic_impulses_give_matching_tempo() {
        // 10 fps, impulse every 5 frames -> 0.5s period -> 120 BPM.
        let env = impulse_envelope(200, 5);
        let bpm = estimate_tempo(&env, 10.0).unwrap();
        assert!((bpm - 120.0).abs() < 1.0, "got {bpm}");
    }

    #[test]
    fn flat_envelope_has_no_tempo() {
        assert!(estimate_tempo(&[0.3; 100], 10.0).is_none());
        assert!(estimate_tempo(&[0.0; 100], 10.0).is_none());
        assert!(estimate_tempo(&[], 10.0).is_none());
    }

    #[test]
    fn picks_each_impulse_once() {
        let env = impulse_envelope(100, 10);
        let beats = pick_beats(&env, 10.0, 1.0);
        assert_eq!(beats.len(), 9);
        for (k, &b) in beats.iter().enumerate() {
            assert!((b - (k + 1) as f32).abs() < 1e-4);
        }
    }

    #[test]
    fn close_peaks_are_merged_to_the_stronger_one() {
        let mut env = vec![0.0f32; 60];
        env[20] = 0.8;
        env[24] = 1.0; // within half a period of the previous peak
        env[40] = 0.9;
        let beats = pick_beats(&env, 10.0, 1.0);
        assert_eq!(beats.len(), 2);
        assert!((beats[0] - 2.4).abs() < 1e-4);
        assert!((beats[1] - 4.0).abs() < 1e-4);
    }
}
