// THEORY:
// The `pipeline` module is the top-level API for transforming an image. It composes
// the individual pixel transforms from `core_modules` into an ordered, named unit
// that the benchmark harness and the CLI can select by name.
//
// Key architectural principles:
// 1.  **Transforms as Data**: A `Transform` is an enum variant carrying its own
//     parameters (shift offsets, kernel). A pipeline is just a name plus a `Vec` of
//     them, so building a new pipeline never needs a new type.
// 2.  **One Capability**: Both `Transform` and `Pipeline` implement `PixelTransform`
//     (`name` + `apply(buffer, thread_count)`), so either can be handed to code that
//     only needs to run "something" over an image.
// 3.  **Single Thread Count**: Every stage of a pipeline runs with the same thread
//     count and receives the previous stage's output. Stages never run concurrently
//     with each other; parallelism lives inside each stage.

use crate::core_modules::kernel::{self, ConvolutionKernel};
use crate::core_modules::pixel_buffer::{BorderColor, PixelBuffer};
use crate::core_modules::{color_inverter, convolution, image_shifter};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The `{name, apply}` capability shared by single transforms and whole pipelines.
pub trait PixelTransform {
    fn name(&self) -> &str;
    fn apply(&self, source: &PixelBuffer, thread_count: usize) -> PixelBuffer;
}

/// A single pixel transform with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// `255 - c` on every channel.
    Invert,
    /// Translation by `(dx, dy)`, filling uncovered pixels with `border`.
    Shift { dx: i64, dy: i64, border: BorderColor },
    /// Convolution with a validated kernel.
    Convolve(ConvolutionKernel),
}

impl PixelTransform for Transform {
    fn name(&self) -> &str {
        match self {
            Transform::Invert => "invert",
            Transform::Shift { .. } => "shift",
            Transform::Convolve(_) => "convolve",
        }
    }

    fn apply(&self, source: &PixelBuffer, thread_count: usize) -> PixelBuffer {
        match self {
            Transform::Invert => color_inverter::invert(source, thread_count),
            Transform::Shift { dx, dy, border } => {
                image_shifter::shift(source, *dx, *dy, *border, thread_count)
            }
            Transform::Convolve(kernel) => convolution::apply(source, kernel, thread_count),
        }
    }
}

/// An ordered, named sequence of transforms.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    name: String,
    transforms: Vec<Transform>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transforms: Vec::new(),
        }
    }

    /// Appends a stage.
    pub fn then(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Color inversion followed by the 3x3 sharpening kernel.
    pub fn invert_contrast() -> Self {
        Self::new(PipelineKind::InvertContrast.name())
            .then(Transform::Invert)
            .then(Transform::Convolve(kernel::sharpen_3x3()))
    }

    /// Translation followed by the 3x3 Gaussian blur.
    pub fn shift_blur(dx: i64, dy: i64, border: BorderColor) -> Self {
        Self::new(PipelineKind::ShiftBlur.name())
            .then(Transform::Shift { dx, dy, border })
            .then(Transform::Convolve(kernel::gaussian_blur_3x3()))
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }
}

impl PixelTransform for Pipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, source: &PixelBuffer, thread_count: usize) -> PixelBuffer {
        let Some((first, rest)) = self.transforms.split_first() else {
            return source.clone();
        };
        rest.iter().fold(first.apply(source, thread_count), |image, transform| {
            transform.apply(&image, thread_count)
        })
    }
}

/// The standard pipelines, selectable by their stable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineKind {
    #[default]
    InvertContrast,
    ShiftBlur,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 2] = [PipelineKind::InvertContrast, PipelineKind::ShiftBlur];

    pub fn name(self) -> &'static str {
        match self {
            PipelineKind::InvertContrast => "invert-contrast",
            PipelineKind::ShiftBlur => "shift-blur",
        }
    }

    /// Builds the pipeline. Shift parameters are ignored by `InvertContrast`.
    pub fn build(self, dx: i64, dy: i64, border: BorderColor) -> Pipeline {
        match self {
            PipelineKind::InvertContrast => Pipeline::invert_contrast(),
            PipelineKind::ShiftBlur => Pipeline::shift_blur(dx, dy, border),
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pipeline `{0}`")]
pub struct UnknownPipeline(pub String);

impl FromStr for PipelineKind {
    type Err = UnknownPipeline;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| UnknownPipeline(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel_buffer::Rgb;

    fn sample(width: u32, height: u32) -> PixelBuffer {
        let pixels = (0..width * height)
            .map(|i| Rgb::new((i * 13 % 256) as u8, (i * 7 % 256) as u8, (i % 256) as u8))
            .collect();
        PixelBuffer::from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn names_are_stable() {
        assert_eq!(Pipeline::invert_contrast().name(), "invert-contrast");
        assert_eq!(Pipeline::shift_blur(1, 2, Rgb::BLACK).name(), "shift-blur");
        assert_eq!("  Shift-Blur ".parse::<PipelineKind>(), Ok(PipelineKind::ShiftBlur));
        assert_eq!(
            "sepia".parse::<PipelineKind>(),
            Err(UnknownPipeline("sepia".to_owned()))
        );
    }

    #[test]
    fn stages_run_in_order() {
        let source = sample(8, 6);
        let pipeline = Pipeline::invert_contrast();
        let expected = convolution::apply(
            &color_inverter::invert(&source, 1),
            &kernel::sharpen_3x3(),
            1,
        );
        assert_eq!(pipeline.apply(&source, 1), expected);

        let border = Rgb::new(187, 38, 73);
        let pipeline = Pipeline::shift_blur(2, 1, border);
        let expected = convolution::apply(
            &image_shifter::shift(&source, 2, 1, border, 1),
            &kernel::gaussian_blur_3x3(),
            1,
        );
        assert_eq!(pipeline.apply(&source, 1), expected);
    }

    #[test]
    fn standard_pipelines_ignore_thread_count() {
        let source = sample(31, 19);
        for kind in PipelineKind::ALL {
            let pipeline = kind.build(5, -3, Rgb::new(10, 20, 30));
            let reference = pipeline.apply(&source, 1);
            for threads in [2, 4, 8] {
                assert_eq!(pipeline.apply(&source, threads), reference, "{kind} threads={threads}");
            }
        }
    }

    #[test]
    fn empty_pipeline_copies_input() {
        let source = sample(3, 3);
        assert_eq!(Pipeline::new("noop").apply(&source, 4), source);
    }

    #[test]
    fn custom_pipelines_compose() {
        let source = sample(4, 4);
        let twice = Pipeline::new("double-invert")
            .then(Transform::Invert)
            .then(Transform::Invert);
        assert_eq!(twice.transforms().len(), 2);
        assert_eq!(twice.apply(&source, 2), source);
    }
}
