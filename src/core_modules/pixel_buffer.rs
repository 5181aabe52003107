// THEORY:
// The `PixelBuffer` is the "dumb" data container every transform reads from and
// writes into. It is a row-major raster of 8-bit RGB pixels with no alpha channel.
//
// Key architectural principles:
// 1.  **Fixed Shape**: Width and height are positive and `pixels.len()` always equals
//     `width * height`. Both constructors enforce this, so nothing downstream has to
//     re-check it.
// 2.  **Row Addressable**: Because storage is row-major, a contiguous span of rows is
//     a contiguous slice. This is what lets the row executor hand each worker its own
//     `&mut` slice of the destination while the source stays shared and read-only.
// 3.  **Fresh Destinations**: Transforms never mutate their input. They allocate a new
//     buffer of the same dimensions with `PixelBuffer::like` and fill it.

use crate::error::{ConfigurationError, ConfigurationResult};

pub type Channel = u8;

/// A single 8-bit-per-channel RGB pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// The red channel value (0-255).
    pub red: Channel,
    /// The green channel value (0-255).
    pub green: Channel,
    /// The blue channel value (0-255).
    pub blue: Channel,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
        Self { red, green, blue }
    }

    /// Builds a color from arbitrary integers, clamping each channel into 0..=255.
    pub fn clamped(red: i64, green: i64, blue: i64) -> Self {
        Self::new(clamp_channel(red), clamp_channel(green), clamp_channel(blue))
    }

    pub fn channels(&self) -> [Channel; 3] {
        [self.red, self.green, self.blue]
    }
}

/// Fill color for pixels a shift leaves without a source counterpart.
pub type BorderColor = Rgb;

#[inline]
pub(crate) fn clamp_channel(value: i64) -> Channel {
    value.clamp(0, 255) as Channel
}

/// An in-memory, row-major RGB raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    /// Creates a buffer filled with a single color.
    pub fn filled(width: u32, height: u32, color: Rgb) -> ConfigurationResult<Self> {
        check_dimensions(width, height)?;
        let len = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            pixels: vec![color; len],
        })
    }

    /// Creates a black buffer.
    pub fn new(width: u32, height: u32) -> ConfigurationResult<Self> {
        Self::filled(width, height, Rgb::BLACK)
    }

    /// Wraps existing row-major pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb>) -> ConfigurationResult<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(ConfigurationError::PixelCountMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A black buffer with the same dimensions as `other`.
    pub fn like(other: &PixelBuffer) -> Self {
        Self {
            width: other.width,
            height: other.height,
            pixels: vec![Rgb::BLACK; other.pixels.len()],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reads the pixel at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgb {
        self.pixels[self.index(x, y)]
    }

    /// Reads the pixel at signed coordinates, or `None` when they fall outside the image.
    #[inline]
    pub fn get_checked(&self, x: i64, y: i64) -> Option<Rgb> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, pixel: Rgb) {
        let index = self.index(x, y);
        self.pixels[index] = pixel;
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    pub fn row(&self, y: u32) -> &[Rgb] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Flattened `R, G, B, R, G, B, ...` bytes, the layout the codec expects.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.channels()).collect()
    }

    /// Inverse of [`PixelBuffer::to_rgb_bytes`].
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: &[u8]) -> ConfigurationResult<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if bytes.len() != expected * 3 {
            return Err(ConfigurationError::PixelCountMismatch {
                expected,
                actual: bytes.len() / 3,
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{}",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }
}

fn check_dimensions(width: u32, height: u32) -> ConfigurationResult<()> {
    if width == 0 || height == 0 {
        return Err(ConfigurationError::EmptyDimensions { width, height });
    }
    Ok(())
}
