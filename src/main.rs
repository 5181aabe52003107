use anyhow::Context;
use log::{info, warn};
use row_parallel_imaging::config::{self, Command, Settings};
use row_parallel_imaging::{
    ImageProcessor, PerformanceTester, PipelineKind, PixelTransform, ScalingReport, fixtures,
    logging, report,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = match config::parse_args(std::env::args().skip(1)) {
        Command::Help => {
            println!("{}", config::USAGE);
            return Ok(());
        }
        Command::Run(settings) => settings,
    };

    let _logger = logging::setup_logging("info", settings.log_dir.as_deref())
        .context("failed to start logger")?;

    let heavy = "=".repeat(80);
    println!("{heavy}\nImage processing program\n{heavy}");

    std::fs::create_dir_all(&settings.input_dir)
        .with_context(|| format!("failed to create {}", settings.input_dir.display()))?;
    std::fs::create_dir_all(&settings.output_dir)
        .with_context(|| format!("failed to create {}", settings.output_dir.display()))?;

    check_thread_counts(&settings);
    fixtures::ensure_fixtures(&settings.input_dir, &settings.sizes)
        .await
        .context("failed to generate test images")?;

    let pipeline = settings.pipeline();
    print_parameters(&settings, pipeline.name());

    let config = settings.test_configuration();
    let tester = PerformanceTester::new(ImageProcessor::new(pipeline), &settings.output_dir)
        .with_cooldown(settings.cooldown);

    info!("Starting performance tests...");
    let results = tester
        .run_thread_scaling_tests(&settings.input_dir, &config)
        .await
        .context("benchmark run failed")?;

    println!();
    print!("{}", report::format_results(&ScalingReport::new(&results, &config)));

    let output_dir = settings
        .output_dir
        .canonicalize()
        .unwrap_or_else(|_| settings.output_dir.clone());
    println!(
        "\n{heavy}\nProcessing completed!\nResults saved to: {}\n{heavy}",
        output_dir.display()
    );
    Ok(())
}

fn check_thread_counts(settings: &Settings) {
    let cores = num_cpus::get();
    info!("Logical cores available: {cores}");
    if settings.thread_counts.last().is_some_and(|&max| max > cores) {
        warn!("Thread counts above {cores} oversubscribe this machine; speedup will flatten");
    }
}

fn print_parameters(settings: &Settings, pipeline_name: &str) {
    println!("\nProcessing parameters:");
    println!("  - Pipeline: {pipeline_name}");
    match settings.pipeline {
        PipelineKind::ShiftBlur => {
            let border = settings.border_color;
            println!("  - Shift X: {} pixels", settings.shift_x);
            println!("  - Shift Y: {} pixels", settings.shift_y);
            println!("  - Border color: RGB({}, {}, {})", border.red, border.green, border.blue);
            println!("  - Operation 2: Gaussian blur convolution (3x3)");
        }
        PipelineKind::InvertContrast => {
            println!("  - Operation 1: color inversion (255 - channel)");
            println!("  - Operation 2: contrast convolution (3x3)");
        }
    }
    println!("  - Runs per size: {}", settings.iterations);
    let threads: Vec<String> = settings.thread_counts.iter().map(ToString::to_string).collect();
    println!("  - Thread counts: {}", threads.join(", "));
    println!();
}
