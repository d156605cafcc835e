use image::{imageops, DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

pub const FRAME_WIDTH: u32 = 1920;
pub const FRAME_HEIGHT: u32 = 1080;
/// Fixed default theme (blue).
pub const DEFAULT_THEME: [u8; 3] = [0, 0, 255];

const WAVEFORM_COLOR: Rgba<u8> = Rgba([0, 255, 255, 255]);

/// Vertical-gradient background: row i scales the theme by i/height, so the
/// top row is black and the bottom row approaches full theme intensity.
/// Pure function of theme and dimensions.
pub fn generate_gradient(width: u32, height: u32, theme: [u8; 3]) -> RgbImage {
    let mut img = RgbImage::new(width, height);
    for y in 0..height {
        let scale = y as f32 / height as f32;
        let px = Rgb([
            (theme[0] as f32 * scale).round() as u8,
            (theme[1] as f32 * scale).round() as u8,
            (theme[2] as f32 * scale).round() as u8,
        ]);
        for x in 0..width {
            img.put_pixel(x, y, px);
        }
    }
    img
}

/// Rasterizes the amplitude envelope (per-sample |amplitude|) as a plot:
/// samples are decimated to one peak per pixel column, drawn as a cyan
/// column rising from the bottom baseline on a transparent background.
pub fn render_waveform(samples: &[f32], width: u32, height: u32) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    if samples.is_empty() || width == 0 || height == 0 {
        return img;
    }

    let n = samples.len();
    let baseline = height - 1;
    for x in 0..width {
        let start = x as usize * n / width as usize;
        let end = (((x as usize + 1) * n) / width as usize).clamp(start + 1, n);

        let mut peak = 0.0f32;
        for &s in &samples[start..end] {
            peak = peak.max(s.abs());
        }
        let peak = peak.min(1.0);

        let rise = (peak * baseline as f32).round() as u32;
        for y in (baseline - rise)..=baseline {
            img.put_pixel(x, y, WAVEFORM_COLOR);
        }
    }
    img
}

/// Waveform alpha-blended centered over the gradient background.
pub fn compose_base(background: &RgbImage, waveform: &RgbaImage) -> RgbaImage {
    let mut base = DynamicImage::ImageRgb8(background.clone()).to_rgba8();
    let x = (base.width().saturating_sub(waveform.width())) / 2;
    let y = (base.height().saturating_sub(waveform.height())) / 2;
    imageops::overlay(&mut base, waveform, x as i64, y as i64);
    base
}

/// Beat-pulse variant of the base frame: channels multiplied by `brighten`
/// (saturating), then a centered crop to `crop_ratio` of each dimension,
/// scaled back up so the output keeps the base dimensions (a zoom pulse).
pub fn pulse_frame(base: &RgbaImage, brighten: f32, crop_ratio: f32) -> RgbaImage {
    let (w, h) = base.dimensions();

    let mut bright = base.clone();
    for px in bright.pixels_mut() {
        for c in 0..3 {
            px.0[c] = (px.0[c] as f32 * brighten).round().min(255.0) as u8;
        }
    }

    let cw = ((w as f32 * crop_ratio).round() as u32).clamp(1, w);
    let ch = ((h as f32 * crop_ratio).round() as u32).clamp(1, h);
    let cropped = imageops::crop_imm(&bright, (w - cw) / 2, (h - ch) / 2, cw, ch).to_image();
    imageops::resize(&cropped, w, h, imageops::FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_rows_match_scaled_theme() {
        let theme = [200, 100, 50];
        let height = 64;
        let img = generate_gradient(8, height, theme);

        for y in 0..height {
            let scale = y as f32 / height as f32;
            let expected = [
                (theme[0] as f32 * scale).round() as u8,
                (theme[1] as f32 * scale).round() as u8,
                (theme[2] as f32 * scale).round() as u8,
            ];
            for x in 0..8 {
                assert_eq!(img.get_pixel(x, y).0, expected, "row {y}");
            }
        }
    }

    #[test]
    fn gradient_is_deterministic() {
        let a = generate_gradient(32, 32, DEFAULT_THEME);
        let b = generate_gradient(32, 32, DEFAULT_THEME);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn waveform_has_requested_dimensions() {
        let samples = vec![0.5f32; 1000];
        let img = render_waveform(&samples, 120, 48);
        assert_eq!(img.dimensions(), (120, 48));
    }

    #[test]
    fn silence_draws_only_the_baseline() {
        let img = render_waveform(&vec![0.0f32; 500], 50, 20);
        for x in 0..50 {
            assert_eq!(img.get_pixel(x, 19).0[3], 255);
            for y in 0..19 {
                assert_eq!(img.get_pixel(x, y).0[3], 0, "pixel ({x},{y}) set");
            }
        }
    }

    #[test]
    fn waveform_is_deterministic() {
        let samples: Vec<f32> = (0..2000).map(|i| (i as f32 * 0.05).sin()).collect();
        let a = render_waveform(&samples, 100, 40);
        let b = render_waveform(&samples, 100, 40);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn compose_keeps_background_dimensions() {
        let bg = generate_gradient(64, 36, DEFAULT_THEME);
        let wf = render_waveform(&[0.5; 100], 40, 16);
        let base = compose_base(&bg, &wf);
        assert_eq!(base.dimensions(), (64, 36));
    }

    #[test]
    fn pulse_frame_keeps_dimensions_and_saturates() {
        let solid = RgbaImage::from_pixel(40, 20, Rgba([200, 200, 200, 255]));
        let pulsed = pulse_frame(&solid, 1.5, 0.9);
        assert_eq!(pulsed.dimensions(), (40, 20));
        // 200 * 1.5 saturates; a uniform image stays uniform through the
        // crop/resize, so any interior pixel will do.
        assert_eq!(pulsed.get_pixel(20, 10).0, [255, 255, 255, 255]);
    }
}
