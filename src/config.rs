// THEORY:
// `Settings` is everything a benchmark run can be tuned with. The command line is
// deliberately forgiving: a flag that cannot be parsed, or parses to something out
// of range, falls back to its documented default instead of aborting the run.

use crate::benchmark::{DEFAULT_COOLDOWN, TestConfiguration};
use crate::core_modules::pixel_buffer::{BorderColor, Rgb};
use crate::fixtures::ImageSize;
use crate::pipeline::{Pipeline, PipelineKind};
use log::warn;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INPUT_DIR: &str = "test_images";
pub const DEFAULT_OUTPUT_DIR: &str = "output_images";
pub const DEFAULT_SHIFT: (i64, i64) = (50, 30);
pub const DEFAULT_ITERATIONS: usize = 3;
pub const DEFAULT_BORDER_COLOR: BorderColor = Rgb::new(187, 38, 73);
pub const DEFAULT_SIZES: [ImageSize; 3] = [
    ImageSize::new(1024, 768),
    ImageSize::new(1280, 960),
    ImageSize::new(2048, 1536),
];
pub const DEFAULT_THREAD_COUNTS: [usize; 8] = [2, 4, 6, 8, 10, 12, 14, 16];

pub const USAGE: &str = "\
Run parameters:
  --inputDir <path>
  --outputDir <path>
  --shiftX <number>
  --shiftY <number>
  --iterations <number>
  --sizes <list>
  --threads <list>
  --pipeline <invert-contrast|shift-blur>
  --borderColor <rgb>
  --cooldownMs <number>
  --logDir <path>
  -h, --help

Examples:
  --sizes 1024x768,1280x960,2048x1536
  --threads 2,4,6,8,10,12,14,16
  --pipeline invert-contrast
  --borderColor 187,38,73";

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Run(Settings),
}

/// Tunables for one benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Where fixtures are read from (and generated into).
    pub input_dir: PathBuf,
    /// Where every output image is written.
    pub output_dir: PathBuf,
    pub shift_x: i64,
    pub shift_y: i64,
    /// Timed runs per configuration, at least one.
    pub iterations: usize,
    pub border_color: BorderColor,
    pub sizes: Vec<ImageSize>,
    /// Sorted, deduplicated, all positive.
    pub thread_counts: Vec<usize>,
    pub pipeline: PipelineKind,
    /// Pause before each timed run.
    pub cooldown: Duration,
    /// When set, logs are also written to rotating files here.
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            shift_x: DEFAULT_SHIFT.0,
            shift_y: DEFAULT_SHIFT.1,
            iterations: DEFAULT_ITERATIONS,
            border_color: DEFAULT_BORDER_COLOR,
            sizes: DEFAULT_SIZES.to_vec(),
            thread_counts: DEFAULT_THREAD_COUNTS.to_vec(),
            pipeline: PipelineKind::default(),
            cooldown: DEFAULT_COOLDOWN,
            log_dir: None,
        }
    }
}

impl Settings {
    pub fn pipeline(&self) -> Pipeline {
        self.pipeline.build(self.shift_x, self.shift_y, self.border_color)
    }

    pub fn test_configuration(&self) -> TestConfiguration {
        TestConfiguration::new(self.sizes.clone(), self.thread_counts.clone(), self.iterations)
    }
}

/// Parses process arguments (without the program name).
pub fn parse_args<I, S>(args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let flags = collect_flags(args);
    if flags.contains_key("help") {
        return Command::Help;
    }
    Command::Run(settings_from_flags(&flags))
}

fn collect_flags<I, S>(args: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
    let mut flags = HashMap::new();
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if arg == "--help" || arg == "-h" {
            flags.insert("help".to_owned(), "true".to_owned());
        } else if let Some(key_value) = arg.strip_prefix("--") {
            match key_value.split_once('=') {
                Some((key, value)) => {
                    flags.insert(key.to_owned(), value.to_owned());
                }
                None => {
                    let value = match args.get(i + 1) {
                        Some(next) if !next.starts_with("--") => {
                            i += 1;
                            next.clone()
                        }
                        _ => "true".to_owned(),
                    };
                    flags.insert(key_value.to_owned(), value);
                }
            }
        } else {
            warn!("ignoring stray argument `{arg}`");
        }
        i += 1;
    }
    flags
}

fn settings_from_flags(flags: &HashMap<String, String>) -> Settings {
    let defaults = Settings::default();
    let get = |key: &str| flags.get(key).map(String::as_str);

    Settings {
        input_dir: get("inputDir").map(PathBuf::from).unwrap_or(defaults.input_dir),
        output_dir: get("outputDir").map(PathBuf::from).unwrap_or(defaults.output_dir),
        shift_x: get("shiftX").and_then(|v| v.trim().parse().ok()).unwrap_or(defaults.shift_x),
        shift_y: get("shiftY").and_then(|v| v.trim().parse().ok()).unwrap_or(defaults.shift_y),
        iterations: get("iterations")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(|n| n.max(1) as usize)
            .unwrap_or(defaults.iterations),
        border_color: get("borderColor").map(parse_border_color).unwrap_or(defaults.border_color),
        sizes: get("sizes").and_then(parse_sizes).unwrap_or(defaults.sizes),
        thread_counts: get("threads")
            .and_then(parse_thread_counts)
            .unwrap_or(defaults.thread_counts),
        pipeline: get("pipeline")
            .map(|name| {
                name.parse::<PipelineKind>().unwrap_or_else(|e| {
                    warn!("{e}; using {}", PipelineKind::default());
                    PipelineKind::default()
                })
            })
            .unwrap_or(defaults.pipeline),
        cooldown: get("cooldownMs")
            .and_then(|v| v.trim().parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.cooldown),
        log_dir: get("logDir").map(PathBuf::from),
    }
}

/// `r,g,b`; a missing or unparseable channel is 0, values clamp to 0..=255.
pub fn parse_border_color(value: &str) -> BorderColor {
    let mut channels = value.split(',').map(|c| c.trim().parse::<i64>().unwrap_or(0));
    let mut next = || channels.next().unwrap_or(0);
    let (red, green, blue) = (next(), next(), next());
    Rgb::clamped(red, green, blue)
}

/// `WxH,WxH,...`; invalid and repeated items are dropped, `None` when nothing valid is left.
pub fn parse_sizes(value: &str) -> Option<Vec<ImageSize>> {
    let mut sizes: Vec<ImageSize> = Vec::new();
    for size in value.split(',').filter_map(|item| item.parse::<ImageSize>().ok()) {
        if !sizes.contains(&size) {
            sizes.push(size);
        }
    }
    (!sizes.is_empty()).then_some(sizes)
}

/// `a,b,c`; non-positive or invalid items are dropped, the rest sorted and deduplicated.
pub fn parse_thread_counts(value: &str) -> Option<Vec<usize>> {
    let mut counts: Vec<usize> = value
        .split(',')
        .filter_map(|item| item.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .collect();
    counts.sort_unstable();
    counts.dedup();
    (!counts.is_empty()).then_some(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> Settings {
        match parse_args(args) {
            Command::Run(settings) => settings,
            Command::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn no_arguments_gives_defaults() {
        assert_eq!(run(&[]), Settings::default());
    }

    #[test]
    fn help_wins_over_everything() {
        assert_eq!(parse_args(["--threads", "2", "-h"]), Command::Help);
        assert_eq!(parse_args(["--help"]), Command::Help);
    }

    #[test]
    fn both_flag_styles_are_accepted() {
        let settings = run(&[
            "--inputDir",
            "in",
            "--outputDir=out",
            "--shiftX",
            "-7",
            "--shiftY=12",
            "--pipeline",
            " SHIFT-BLUR ",
            "--iterations",
            "5",
        ]);
        assert_eq!(settings.input_dir, PathBuf::from("in"));
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert_eq!((settings.shift_x, settings.shift_y), (-7, 12));
        assert_eq!(settings.pipeline, PipelineKind::ShiftBlur);
        assert_eq!(settings.iterations, 5);
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let settings = run(&[
            "--shiftX=left",
            "--iterations=-3",
            "--sizes=big,0x5",
            "--threads=0,-2,x",
            "--pipeline=sepia",
            "--cooldownMs=soon",
        ]);
        assert_eq!(settings.shift_x, DEFAULT_SHIFT.0);
        assert_eq!(settings.iterations, 1);
        assert_eq!(settings.sizes, DEFAULT_SIZES.to_vec());
        assert_eq!(settings.thread_counts, DEFAULT_THREAD_COUNTS.to_vec());
        assert_eq!(settings.pipeline, PipelineKind::InvertContrast);
        assert_eq!(settings.cooldown, DEFAULT_COOLDOWN);
    }

    #[test]
    fn lists_are_filtered_and_normalized() {
        assert_eq!(
            parse_sizes("640x480, bogus ,32X16"),
            Some(vec![ImageSize::new(640, 480), ImageSize::new(32, 16)])
        );
        assert_eq!(
            parse_sizes("400x300,32x16,400X300"),
            Some(vec![ImageSize::new(400, 300), ImageSize::new(32, 16)])
        );
        assert_eq!(parse_thread_counts("8, 2,4,2,0"), Some(vec![2, 4, 8]));
        assert_eq!(parse_thread_counts(""), None);
    }

    #[test]
    fn border_color_is_clamped_and_padded() {
        assert_eq!(parse_border_color("187,38,73"), Rgb::new(187, 38, 73));
        assert_eq!(parse_border_color("300,-5"), Rgb::new(255, 0, 0));
        assert_eq!(parse_border_color("x, 12 ,y"), Rgb::new(0, 12, 0));
    }

    #[test]
    fn flag_without_value_does_not_swallow_next_flag() {
        let settings = run(&["--shiftX", "--threads", "3"]);
        assert_eq!(settings.shift_x, DEFAULT_SHIFT.0);
        assert_eq!(settings.thread_counts, vec![3]);
    }

    #[test]
    fn settings_build_matching_pipeline() {
        let settings = run(&[
            "--pipeline=shift-blur",
            "--shiftX=3",
            "--shiftY=4",
            "--borderColor=1,2,3",
        ]);
        assert_eq!(settings.pipeline(), Pipeline::shift_blur(3, 4, Rgb::new(1, 2, 3)));
        assert_eq!(settings.test_configuration().iterations(), DEFAULT_ITERATIONS);
    }
}
