// THEORY:
// The `benchmark` module measures how a pipeline's cost scales with thread count and
// image size. It drives the `ImageProcessor` over the cross product of configured
// thread counts and sizes and turns the raw timings into summary statistics.
//
// Key architectural principles:
// 1.  **Isolated Samples**: Invocations run one at a time. Each one goes to a
//     blocking worker via `spawn_blocking` so the transform's own row pool has the
//     machine to itself and the async runtime is never stalled. A warm-up run and a
//     short cool-down pause keep the first sample from paying one-off costs.
// 2.  **Skip, Don't Abort**: A missing or unreadable fixture costs one size, not the
//     whole run. Only failures to write outputs end the run.
// 3.  **Injected Reporting**: Progress goes through the `Reporter` trait. The console
//     reporter logs; tests record events instead, so the harness runs silently.
// 4.  **Immutable Results**: A `TestResult` is created once per (size, thread count)
//     after its iterations finish. Statistics are derived from it on demand.

use crate::error::{BenchmarkResult, CodecError};
use crate::fixtures::{ImageSize, fixture_path};
use crate::pipeline::PixelTransform;
use crate::processor::ImageProcessor;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(100);

/// Which sizes and thread counts to measure, and how often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestConfiguration {
    image_sizes: Vec<ImageSize>,
    thread_counts: Vec<usize>,
    iterations: usize,
}

impl TestConfiguration {
    /// Sizes keep their order with duplicates removed; thread counts are sorted,
    /// deduplicated and stripped of zeros; iterations are at least one.
    pub fn new(image_sizes: Vec<ImageSize>, thread_counts: Vec<usize>, iterations: usize) -> Self {
        let mut sizes: Vec<ImageSize> = Vec::with_capacity(image_sizes.len());
        for size in image_sizes {
            if !sizes.contains(&size) {
                sizes.push(size);
            }
        }

        let mut threads: Vec<usize> = thread_counts.into_iter().filter(|&t| t > 0).collect();
        threads.sort_unstable();
        threads.dedup();

        Self {
            image_sizes: sizes,
            thread_counts: threads,
            iterations: iterations.max(1),
        }
    }

    pub fn image_sizes(&self) -> &[ImageSize] {
        &self.image_sizes
    }

    pub fn thread_counts(&self) -> &[usize] {
        &self.thread_counts
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// The smallest configured thread count, used as the speedup denominator.
    pub fn baseline_thread_count(&self) -> Option<usize> {
        self.thread_counts.first().copied()
    }
}

/// Timings for one (size, thread count) configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub width: u32,
    pub height: u32,
    pub thread_count: usize,
    pub timings: Vec<Duration>,
    /// The canonical result image written after the timed runs.
    pub output_file: PathBuf,
}

impl TestResult {
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    fn timings_ms(&self) -> impl Iterator<Item = f64> + '_ {
        self.timings.iter().map(|t| t.as_secs_f64() * 1000.0)
    }

    /// Mean sample in milliseconds; zero without samples.
    pub fn average_ms(&self) -> f64 {
        if self.timings.is_empty() {
            return 0.0;
        }
        self.timings_ms().sum::<f64>() / self.timings.len() as f64
    }

    pub fn min(&self) -> Duration {
        self.timings.iter().min().copied().unwrap_or_default()
    }

    pub fn max(&self) -> Duration {
        self.timings.iter().max().copied().unwrap_or_default()
    }

    /// Population standard deviation (divides by `n`) in milliseconds.
    pub fn standard_deviation_ms(&self) -> f64 {
        if self.timings.is_empty() {
            return 0.0;
        }
        let mean = self.average_ms();
        let variance = self
            .timings_ms()
            .map(|t| (t - mean) * (t - mean))
            .sum::<f64>()
            / self.timings.len() as f64;
        variance.sqrt()
    }
}

/// One line of a scaling table: a result and its speedup over the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingEntry<'a> {
    pub result: &'a TestResult,
    /// `None` when the baseline is missing for this size or the average is zero.
    pub speedup: Option<f64>,
}

/// All results for one image size, ordered by thread count.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeScaling<'a> {
    pub size: ImageSize,
    pub entries: Vec<ScalingEntry<'a>>,
}

/// Results grouped by size with speedups relative to the baseline thread count.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingReport<'a> {
    pub baseline_thread_count: Option<usize>,
    pub sizes: Vec<SizeScaling<'a>>,
}

impl<'a> ScalingReport<'a> {
    /// Groups `results` by size in order of first appearance. Thread counts with no
    /// result for a size are simply absent from that size's entries. Speedups are
    /// relative to `config`'s baseline thread count.
    pub fn new(results: &'a [TestResult], config: &TestConfiguration) -> Self {
        let baseline_thread_count = config.baseline_thread_count();

        let mut sizes: Vec<ImageSize> = Vec::new();
        for result in results {
            if !sizes.contains(&result.size()) {
                sizes.push(result.size());
            }
        }

        let sizes = sizes
            .into_iter()
            .map(|size| {
                let mut for_size: Vec<&TestResult> =
                    results.iter().filter(|r| r.size() == size).collect();
                for_size.sort_by_key(|r| r.thread_count);

                let baseline = baseline_thread_count
                    .and_then(|t| for_size.iter().find(|r| r.thread_count == t))
                    .map(|r| r.average_ms());

                let entries = for_size
                    .into_iter()
                    .map(|result| ScalingEntry {
                        result,
                        speedup: speedup(baseline, result.average_ms()),
                    })
                    .collect();
                SizeScaling { size, entries }
            })
            .collect();

        Self {
            baseline_thread_count,
            sizes,
        }
    }
}

/// `baseline / current`, or `None` when either side is unusable.
pub fn speedup(baseline_ms: Option<f64>, current_ms: f64) -> Option<f64> {
    baseline_ms.filter(|_| current_ms > 0.0).map(|b| b / current_ms)
}

/// Receives progress events from a benchmark run.
pub trait Reporter: Send + Sync {
    fn thread_count_started(&self, _thread_count: usize) {}
    fn size_started(&self, _size: ImageSize) {}
    fn fixture_skipped(&self, _size: ImageSize, _reason: &CodecError) {}
    fn warm_up_finished(&self, _thread_count: usize) {}
    fn iteration_finished(
        &self,
        _iteration: usize,
        _iterations: usize,
        _thread_count: usize,
        _elapsed: Duration,
    ) {
    }
    fn result_ready(&self, _result: &TestResult) {}
}

/// Reports progress through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn thread_count_started(&self, thread_count: usize) {
        info!("Running tests with thread count: {thread_count}");
    }

    fn size_started(&self, size: ImageSize) {
        info!("Testing size: {size}");
    }

    fn fixture_skipped(&self, size: ImageSize, reason: &CodecError) {
        warn!("Skipping size {size}: {reason}");
    }

    fn warm_up_finished(&self, thread_count: usize) {
        info!("  Warm-up (threads={thread_count}) done");
    }

    fn iteration_finished(
        &self,
        iteration: usize,
        iterations: usize,
        thread_count: usize,
        elapsed: Duration,
    ) {
        info!(
            "  Run {iteration}/{iterations} (threads={thread_count})... {} ms",
            elapsed.as_millis()
        );
    }

    fn result_ready(&self, result: &TestResult) {
        info!("  [OK] Average time: {:.2} ms", result.average_ms());
    }
}

/// Runs a processor across a `TestConfiguration` and collects `TestResult`s.
pub struct PerformanceTester<R: Reporter = ConsoleReporter> {
    processor: Arc<ImageProcessor>,
    output_dir: PathBuf,
    reporter: R,
    cooldown: Duration,
}

impl PerformanceTester<ConsoleReporter> {
    pub fn new(processor: ImageProcessor, output_dir: impl Into<PathBuf>) -> Self {
        Self::with_reporter(processor, output_dir, ConsoleReporter)
    }
}

impl<R: Reporter> PerformanceTester<R> {
    pub fn with_reporter(
        processor: ImageProcessor,
        output_dir: impl Into<PathBuf>,
        reporter: R,
    ) -> Self {
        Self {
            processor: Arc::new(processor),
            output_dir: output_dir.into(),
            reporter,
            cooldown: DEFAULT_COOLDOWN,
        }
    }

    /// Pause before every timed run.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Measures every (thread count, size) pair. Thread counts form the outer loop.
    pub async fn run_thread_scaling_tests(
        &self,
        input_dir: &Path,
        config: &TestConfiguration,
    ) -> BenchmarkResult<Vec<TestResult>> {
        info!(
            "Benchmarking pipeline {} over {} sizes x {} thread counts",
            self.processor.pipeline().name(),
            config.image_sizes().len(),
            config.thread_counts().len()
        );

        let mut results = Vec::new();
        for &thread_count in config.thread_counts() {
            self.reporter.thread_count_started(thread_count);
            for &size in config.image_sizes() {
                self.reporter.size_started(size);
                let measured = self
                    .measure(input_dir, size, thread_count, config.iterations())
                    .await?;
                if let Some(result) = measured {
                    self.reporter.result_ready(&result);
                    results.push(result);
                }
            }
        }
        Ok(results)
    }

    async fn measure(
        &self,
        input_dir: &Path,
        size: ImageSize,
        thread_count: usize,
        iterations: usize,
    ) -> BenchmarkResult<Option<TestResult>> {
        let input = fixture_path(input_dir, size);
        if !input.exists() {
            self.reporter.fixture_skipped(size, &CodecError::NotFound(input));
            return Ok(None);
        }

        let warm_up_output = self.run_output(size, thread_count, 1);
        match self.invoke(&input, &warm_up_output, thread_count).await? {
            Ok(_) => self.reporter.warm_up_finished(thread_count),
            Err(e) if e.is_input_error() => {
                self.reporter.fixture_skipped(size, &e);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }

        let mut timings = Vec::with_capacity(iterations);
        for iteration in 1..=iterations {
            if !self.cooldown.is_zero() {
                tokio::time::sleep(self.cooldown).await;
            }
            let output = self.run_output(size, thread_count, iteration);
            let elapsed = self.invoke(&input, &output, thread_count).await??;
            self.reporter
                .iteration_finished(iteration, iterations, thread_count, elapsed);
            timings.push(elapsed);
        }

        let output_file = self
            .output_dir
            .join(format!("result_{size}_t{thread_count}.png"));
        self.invoke(&input, &output_file, thread_count).await??;

        Ok(Some(TestResult {
            width: size.width,
            height: size.height,
            thread_count,
            timings,
            output_file,
        }))
    }

    fn run_output(&self, size: ImageSize, thread_count: usize, iteration: usize) -> PathBuf {
        self.output_dir
            .join(format!("output_{size}_t{thread_count}_run{iteration}.png"))
    }

    /// One processor call on the blocking pool. The outer result is the task join,
    /// the inner one the codec outcome.
    async fn invoke(
        &self,
        input: &Path,
        output: &Path,
        thread_count: usize,
    ) -> BenchmarkResult<Result<Duration, CodecError>> {
        let processor = Arc::clone(&self.processor);
        let (input, output) = (input.to_path_buf(), output.to_path_buf());
        let outcome = tokio::task::spawn_blocking(move || {
            processor.process_image(&input, &output, thread_count)
        })
        .await?;
        Ok(outcome)
    }
}
