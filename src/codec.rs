// THEORY:
// The codec is the boundary between files on disk and `PixelBuffer`s. Everything
// that crosses it is normalized to 8-bit RGB: palettes, grayscale, 16-bit and alpha
// inputs are all converted on load, and output is always written from RGB8.

use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::error::{CodecError, CodecResult};
use image::{ImageError, ImageReader, RgbImage};
use std::path::Path;

/// Output encodings supported by `save`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
    Gif,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Gif => "gif",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Gif => "image/gif",
        }
    }

    fn as_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Gif => image::ImageFormat::Gif,
        }
    }
}

/// Decodes the image at `path` into an RGB buffer. The decoder is chosen from the
/// file contents, so the extension does not have to match.
pub fn load(path: &Path) -> CodecResult<PixelBuffer> {
    if !path.exists() {
        return Err(CodecError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(CodecError::NotAFile(path.to_path_buf()));
    }

    let decode_error = |source: ImageError| CodecError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let decoded = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_error(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_error)?;
    from_rgb_image(decoded.into_rgb8()).map_err(|source| CodecError::InvalidImage {
        path: path.to_path_buf(),
        source,
    })
}

/// Encodes `buffer` to `path`, creating missing parent directories.
pub fn save(buffer: &PixelBuffer, path: &Path, format: ImageFormat) -> CodecResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CodecError::OutputDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    to_rgb_image(buffer)
        .save_with_format(path, format.as_image_format())
        .map_err(|source| CodecError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

pub fn to_rgb_image(buffer: &PixelBuffer) -> RgbImage {
    RgbImage::from_fn(buffer.width(), buffer.height(), |x, y| {
        image::Rgb(buffer.get(x, y).channels())
    })
}

pub fn from_rgb_image(image: RgbImage) -> crate::error::ConfigurationResult<PixelBuffer> {
    let (width, height) = image.dimensions();
    PixelBuffer::from_rgb_bytes(width, height, image.as_raw())
}
