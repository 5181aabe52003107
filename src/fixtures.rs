// THEORY:
// Benchmarks need inputs that look like real photographs (smooth gradients, hard
// edges, overlapping colors) and that are identical on every machine. The fixture
// generator paints such an image from a fixed seed and writes it once per size;
// later runs reuse the file.

use crate::codec::{self, ImageFormat};
use crate::core_modules::pixel_buffer::{PixelBuffer, Rgb};
use crate::error::{BenchmarkResult, ConfigurationResult};
use futures::future::try_join_all;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const FIXTURE_SEED: u64 = 42;
const DISC_COUNT: usize = 20;
const GRADIENT_START: Rgb = Rgb::new(30, 60, 114);
const GRADIENT_END: Rgb = Rgb::new(42, 82, 152);
const WAVE_STEP: usize = 10;
const WAVE_AMPLITUDE: f64 = 100.0;
const WAVE_FREQUENCY: f64 = 0.02;
const WAVE_ALPHA: u8 = 30;

/// Width and height of a benchmark image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ImageSize {
    type Err = String;

    /// Parses `<width>x<height>`; both sides must be positive integers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let (w, h) = lowered
            .split_once('x')
            .ok_or_else(|| format!("`{s}` is not <width>x<height>"))?;
        let width: u32 = w.trim().parse().map_err(|_| format!("bad width in `{s}`"))?;
        let height: u32 = h.trim().parse().map_err(|_| format!("bad height in `{s}`"))?;
        if width == 0 || height == 0 {
            return Err(format!("`{s}` has a zero dimension"));
        }
        Ok(Self::new(width, height))
    }
}

/// Location of the fixture for `size` inside `dir`.
pub fn fixture_path(dir: &Path, size: ImageSize) -> PathBuf {
    dir.join(format!("test_{size}.png"))
}

/// Paints the deterministic test image for `size`.
pub fn generate_fixture(size: ImageSize) -> ConfigurationResult<PixelBuffer> {
    let ImageSize { width, height } = size;
    let mut canvas = gradient(width, height)?;
    let mut rng = StdRng::seed_from_u64(FIXTURE_SEED);

    for _ in 0..DISC_COUNT {
        let cx = rng.gen_range(0..width) as i64;
        let cy = rng.gen_range(0..height) as i64;
        let radius = rng.gen_range(50..150) as i64;
        let alpha = rng.gen_range(100..200) as u8;
        let color = Rgb::new(
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
        );
        fill_disc(&mut canvas, cx, cy, radius, color, alpha);
    }

    draw_waves(&mut canvas);
    Ok(canvas)
}

/// Writes a fixture for every size in `sizes` that does not have one yet.
/// Returns the paths that were created; existing files are left alone. Repeated
/// sizes are generated once.
pub async fn ensure_fixtures(dir: &Path, sizes: &[ImageSize]) -> BenchmarkResult<Vec<PathBuf>> {
    let mut missing: Vec<(ImageSize, PathBuf)> = Vec::new();
    for &size in sizes {
        let path = fixture_path(dir, size);
        if !path.exists() && !missing.iter().any(|(seen, _)| *seen == size) {
            missing.push((size, path));
        }
    }

    let jobs = missing.into_iter().map(|(size, path)| {
        tokio::task::spawn_blocking(move || -> BenchmarkResult<PathBuf> {
            info!("Generating test image: {}", path.display());
            codec::save(&generate_fixture(size)?, &path, ImageFormat::Png)?;
            Ok(path)
        })
    });

    let mut created = Vec::new();
    for outcome in try_join_all(jobs).await? {
        created.push(outcome?);
    }
    if !created.is_empty() {
        info!("Test images created in: {}", dir.display());
    }
    Ok(created)
}

fn gradient(width: u32, height: u32) -> ConfigurationResult<PixelBuffer> {
    // Projection onto the (0,0) -> (width,height) diagonal
    let length_sq = width as f64 * width as f64 + height as f64 * height as f64;
    let pixels = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let projection = x as f64 * width as f64 + y as f64 * height as f64;
            let t = (projection / length_sq).clamp(0.0, 1.0);
            lerp(GRADIENT_START, GRADIENT_END, t)
        })
        .collect();
    PixelBuffer::from_pixels(width, height, pixels)
}

fn lerp(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    Rgb::new(mix(from.red, to.red), mix(from.green, to.green), mix(from.blue, to.blue))
}

fn blend(under: Rgb, over: Rgb, alpha: u8) -> Rgb {
    let a = alpha as u32;
    let mix = |u: u8, o: u8| ((o as u32 * a + u as u32 * (255 - a) + 127) / 255) as u8;
    Rgb::new(
        mix(under.red, over.red),
        mix(under.green, over.green),
        mix(under.blue, over.blue),
    )
}

fn fill_disc(canvas: &mut PixelBuffer, cx: i64, cy: i64, radius: i64, color: Rgb, alpha: u8) {
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);
    let y_range = (cy - radius).max(0)..(cy + radius).min(height);
    for y in y_range {
        for x in (cx - radius).max(0)..(cx + radius).min(width) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= radius * radius {
                let (x, y) = (x as u32, y as u32);
                canvas.set(x, y, blend(canvas.get(x, y), color, alpha));
            }
        }
    }
}

fn draw_waves(canvas: &mut PixelBuffer) {
    let (width, height) = (canvas.width(), canvas.height());
    let middle = (height / 2) as f64;
    for x in (0..width as usize).step_by(WAVE_STEP) {
        let phase = x as f64 * WAVE_FREQUENCY;
        let y1 = (middle + phase.sin() * WAVE_AMPLITUDE) as i64;
        let y2 = (middle + phase.cos() * WAVE_AMPLITUDE) as i64;
        let top = y1.min(y2).max(0);
        let bottom = y1.max(y2).min(height as i64 - 1);
        for y in top..=bottom {
            let (x, y) = (x as u32, y as u32);
            canvas.set(x, y, blend(canvas.get(x, y), Rgb::WHITE, WAVE_ALPHA));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_parse_leniently() {
        assert_eq!(" 1024X768 ".parse::<ImageSize>(), Ok(ImageSize::new(1024, 768)));
        assert!("1024".parse::<ImageSize>().is_err());
        assert!("0x10".parse::<ImageSize>().is_err());
        assert!("-4x10".parse::<ImageSize>().is_err());
        assert_eq!(ImageSize::new(64, 48).to_string(), "64x48");
    }

    #[test]
    fn fixture_is_deterministic() {
        let size = ImageSize::new(160, 120);
        let first = generate_fixture(size).unwrap();
        assert_eq!((first.width(), first.height()), (160, 120));
        assert_eq!(first, generate_fixture(size).unwrap());
        assert!(generate_fixture(ImageSize::new(0, 4)).is_err());
    }

    #[test]
    fn gradient_runs_corner_to_corner() {
        let canvas = gradient(10, 10).unwrap();
        assert_eq!(canvas.get(0, 0), GRADIENT_START);
        // (9*10 + 9*10) / (10^2 + 10^2)
        assert_eq!(canvas.get(9, 9), lerp(GRADIENT_START, GRADIENT_END, 0.9));
    }

    #[test]
    fn blend_extremes() {
        let under = Rgb::new(10, 20, 30);
        assert_eq!(blend(under, Rgb::WHITE, 0), under);
        assert_eq!(blend(under, Rgb::WHITE, 255), Rgb::WHITE);
    }

    #[tokio::test]
    async fn ensure_fixtures_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let sizes = [ImageSize::new(32, 24), ImageSize::new(16, 16)];

        let created = ensure_fixtures(dir.path(), &sizes).await.unwrap();
        assert_eq!(created.len(), 2);
        let loaded = codec::load(&fixture_path(dir.path(), sizes[0])).unwrap();
        assert_eq!(loaded, generate_fixture(sizes[0]).unwrap());

        let again = ensure_fixtures(dir.path(), &sizes).await.unwrap();
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn repeated_sizes_are_generated_once() {
        let dir = tempfile::tempdir().unwrap();
        let size = ImageSize::new(20, 10);

        let created = ensure_fixtures(dir.path(), &[size, size, size, size]).await.unwrap();
        assert_eq!(created, vec![fixture_path(dir.path(), size)]);
        assert_eq!(codec::load(&created[0]).unwrap(), generate_fixture(size).unwrap());
    }
}
