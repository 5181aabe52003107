// THEORY:
// This file is the entry point for the `row_parallel_imaging` library crate.
//
// The pixel transforms and the row executor that parallelizes them live in
// `core_modules`. `pipeline` composes them into named units, and `benchmark` measures
// how those units scale with thread count and image size. The remaining modules are
// the collaborators a real run needs around that core: file codec, fixture
// generator, processor, settings, logging and console report.

pub mod benchmark;
pub mod codec;
pub mod config;
pub mod core_modules;
pub mod error;
pub mod fixtures;
pub mod logging;
pub mod pipeline;
pub mod processor;
pub mod report;

pub use benchmark::{PerformanceTester, Reporter, ScalingReport, TestConfiguration, TestResult};
pub use core_modules::kernel::ConvolutionKernel;
pub use core_modules::pixel_buffer::{BorderColor, PixelBuffer, Rgb};
pub use error::{BenchmarkError, CodecError, ConfigurationError};
pub use fixtures::ImageSize;
pub use pipeline::{Pipeline, PipelineKind, PixelTransform, Transform};
pub use processor::ImageProcessor;
