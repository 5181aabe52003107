// THEORY:
// The `ImageProcessor` is one complete unit of benchmarked work: decode a file, run
// the pipeline, encode the result. The time it reports covers all three steps,
// because that is the wall-clock cost a user of the tool actually pays per image.

use crate::codec::{self, ImageFormat};
use crate::error::CodecResult;
use crate::pipeline::{Pipeline, PixelTransform};
use log::debug;
use std::path::Path;
use std::time::{Duration, Instant};

/// Runs one pipeline over image files. Outputs are always written as PNG.
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    pipeline: Pipeline,
}

impl ImageProcessor {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Loads `input`, applies the pipeline with `thread_count` workers and writes `output`.
    /// Returns the elapsed wall-clock time of the whole round trip.
    pub fn process_image(
        &self,
        input: &Path,
        output: &Path,
        thread_count: usize,
    ) -> CodecResult<Duration> {
        let start = Instant::now();

        let original = codec::load(input)?;
        let processed = self.pipeline.apply(&original, thread_count);
        codec::save(&processed, output, ImageFormat::Png)?;

        let elapsed = start.elapsed();
        debug!(
            "{} {} -> {} with {thread_count} threads in {elapsed:?}",
            self.pipeline.name(),
            input.display(),
            output.display()
        );
        Ok(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel_buffer::{PixelBuffer, Rgb};

    #[test]
    fn writes_the_pipeline_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out/inverted.png");
        let source = PixelBuffer::filled(4, 3, Rgb::new(0, 55, 255)).unwrap();
        codec::save(&source, &input, ImageFormat::Png).unwrap();

        let pipeline = Pipeline::new("invert").then(crate::pipeline::Transform::Invert);
        let processor = ImageProcessor::new(pipeline);
        processor.process_image(&input, &output, 2).unwrap();

        let written = codec::load(&output).unwrap();
        assert!(written.pixels().iter().all(|&p| p == Rgb::new(255, 200, 0)));
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let processor = ImageProcessor::new(Pipeline::invert_contrast());
        let err = processor
            .process_image(&dir.path().join("nope.png"), &dir.path().join("out.png"), 1)
            .unwrap_err();
        assert!(err.is_input_error());
    }
}
