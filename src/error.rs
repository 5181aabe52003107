// THEORY:
// Errors are split by the stage that raises them. A `ConfigurationError` can only
// come out of a constructor (kernel, pixel buffer), so a pipeline that was built
// successfully can never fail while it is being applied. A `CodecError` belongs to
// the load/save boundary and is handed back to whoever asked for the file. The
// benchmark harness wraps both into a `BenchmarkError` for the cases that end a run.

use std::path::PathBuf;
use thiserror::Error;

/// Rejected construction of a kernel or pixel buffer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("kernel size must be an odd number, got {0}")]
    EvenKernelSize(usize),

    #[error("kernel matrix has {actual} rows, expected {expected}")]
    KernelRowCount { expected: usize, actual: usize },

    #[error("kernel matrix must be square: row {row} has {actual} values, expected {expected}")]
    KernelNotSquare {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("kernel divisor must be non-zero")]
    ZeroDivisor,

    #[error("pixel buffer dimensions must be positive, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} pixels, expected {expected}")]
    PixelCountMismatch { expected: usize, actual: usize },
}

/// Failure to decode or encode an image file.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("error loading image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("error saving image {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not create output directory {}: {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decoded image {} is unusable: {source}", path.display())]
    InvalidImage {
        path: PathBuf,
        #[source]
        source: ConfigurationError,
    },
}

impl CodecError {
    /// True when the failure concerns the file being read rather than the one being written.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::NotAFile(_) | Self::Decode { .. } | Self::InvalidImage { .. }
        )
    }
}

/// A failure that aborts a whole benchmark run.
#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("benchmark worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
pub type CodecResult<T> = Result<T, CodecError>;
pub type BenchmarkResult<T> = Result<T, BenchmarkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_side_errors_are_classified() {
        assert!(CodecError::NotFound(PathBuf::from("a.png")).is_input_error());
        assert!(CodecError::NotAFile(PathBuf::from("dir")).is_input_error());

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = CodecError::OutputDirectory {
            path: PathBuf::from("out"),
            source: io,
        };
        assert!(!err.is_input_error());
    }

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            ConfigurationError::EvenKernelSize(4).to_string(),
            "kernel size must be an odd number, got 4"
        );
        assert_eq!(
            ConfigurationError::EmptyDimensions { width: 0, height: 3 }.to_string(),
            "pixel buffer dimensions must be positive, got 0x3"
        );
    }
}
