// Wraps flexi_logger setup so main only deals with the returned handle
use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
};

use crate::config::Config;

/// Starts the global logger described by `config`.
///
/// Logs go to stderr unless `log_dir` is set, in which case they are written
/// to size-rotated files there. Keep the returned handle alive for the life
/// of the process and call [`shutdown`] before exit.
pub fn init(config: &Config) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = Logger::try_with_str(&config.log_level)?;
    let handle = match &config.log_dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir).basename("boardgame-reviews"))
            .rotate(
                Criterion::Size(config.max_log_file_size),
                Naming::Numbers,
                Cleanup::KeepLogFiles(config.max_log_files),
            )
            .append()
            .start()?,
        None => logger.log_to_stderr().start()?,
    };

    log::info!(
        "[LOG] logging initialised at '{}' ({})",
        config.log_level,
        config.log_dir.as_deref().unwrap_or("stderr")
    );
    Ok(handle)
}

// Flush anything buffered before the process exits
pub fn shutdown(handle: LoggerHandle) {
    handle.flush();
    handle.shutdown();
}
