use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
};
use std::path::Path;

/// Installs the process-wide logger. `RUST_LOG` overrides `base_level` when set.
///
/// Without `log_dir` everything goes to stdout. With it, logs rotate in that directory
/// (1 MB per file, five kept) and are duplicated to stdout.
/// The returned handle must be kept alive until the program exits.
pub fn setup_logging(
    base_level: &str,
    log_dir: Option<&Path>,
) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = Logger::try_with_env_or_str(base_level)?;

    let logger = match log_dir {
        Some(dir) => logger
            .log_to_file(
                FileSpec::default()
                    .directory(dir)
                    .basename("row_parallel_imaging"),
            )
            .duplicate_to_stdout(Duplicate::All)
            .rotate(
                Criterion::Size(1024 * 1024), //1MB
                Naming::Timestamps,
                Cleanup::KeepLogFiles(5),
            ),
        None => logger.log_to_stdout(),
    };

    logger.start()
}
