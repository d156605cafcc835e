use std::sync::Arc;

use ndarray::Array2;
use rustfft::{num_complex::Complex, Fft, FftPlanner};

pub const WIN_LENGTH: usize = 2048;
pub const HOP_LENGTH: usize = 512;

/// STFT-based onset envelope extractor.
///
/// Pipeline: Hann-windowed frames -> magnitude spectrum -> log compression
/// log10(1 + x) -> positive first-order difference summed per frame
/// (spectral flux).
pub struct OnsetExtractor {
    sample_rate: u32,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
}

impl OnsetExtractor {
    pub fn new(sample_rate: u32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(WIN_LENGTH);

        let window: Vec<f32> = (0..WIN_LENGTH)
            .map(|i| {
                0.5 * (1.0
                    - (2.0 * std::f32::consts::PI * i as f32 / (WIN_LENGTH - 1) as f32).cos())
            })
            .collect();

        Self {
            sample_rate,
            fft,
            window,
        }
    }

    /// Envelope frame rate: one value per hop.
    pub fn frames_per_second(&self) -> f32 {
        self.sample_rate as f32 / HOP_LENGTH as f32
    }

    /// Log magnitude spectrogram, shape (frames, bins).
    fn spectrogram(&self, samples: &[f32]) -> Array2<f32> {
        let num_bins = WIN_LENGTH / 2 + 1;
        if samples.len() < WIN_LENGTH {
            return Array2::zeros((0, num_bins));
        }
        let num_frames = (samples.len() - WIN_LENGTH) / HOP_LENGTH + 1;
        let mut spec = Array2::zeros((num_frames, num_bins));

        let mut buf: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); WIN_LENGTH];
        for f in 0..num_frames {
            let start = f * HOP_LENGTH;
            for (i, slot) in buf.iter_mut().enumerate() {
                *slot = Complex::new(samples[start + i] * self.window[i], 0.0);
            }
            self.fft.process(&mut buf);

            for (b, c) in buf.iter().take(num_bins).enumerate() {
                spec[[f, b]] = (1.0 + c.norm()).log10();
            }
        }
        spec
    }

    /// Positive spectral flux per frame. Frame 0 has no predecessor and is 0.
    pub fn onset_envelope(&self, samples: &[f32]) -> Vec<f32> {
        let spec = self.spectrogram(samples);
        let frames = spec.nrows();
        let mut flux = vec![0.0f32; frames];

        for t in 1..frames {
            let mut sum = 0.0;
            for b in 0..spec.ncols() {
                let d = spec[[t, b]] - spec[[t - 1, b]];
                if d > 0.0 {
                    sum += d;
                }
            }
            flux[t] = sum;
        }
        flux
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_yields_empty_envelope() {
        let extractor = OnsetExtractor::new(44_100);
        assert!(extractor.onset_envelope(&[0.0; 100]).is_empty());
    }

    #[test]
    fn flux_spikes_where_a_burst_enters() {
        let sr = 8_000;
        let mut samples = vec![0.0f32; sr as usize * 2];
        // Burst one second in.
        for s in samples.iter_mut().skip(sr as usize).take(256) {
            *s = 1.0;
        }

        let extractor = OnsetExtractor::new(sr);
        let flux = extractor.onset_envelope(&samples);
        let peak_frame = flux
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        let peak_time = peak_frame as f32 / extractor.frames_per_second();
        // The frame timestamp is the window start, so the peak lands within
        // one window length of the burst.
        assert!(
            (peak_time - 1.0).abs() < WIN_LENGTH as f32 / sr as f32 + 0.01,
            "peak at {peak_time}s"
        );
    }

    #[test]
    fn envelope_is_deterministic() {
        let samples: Vec<f32> = (0..16_384).map(|i| (i as f32 * 0.01).sin()).collect();
        let extractor = OnsetExtractor::new(22_050);
        assert_eq!(
            extractor.onset_envelope(&samples),
            extractor.onset_envelope(&samples)
        );
    }
}
