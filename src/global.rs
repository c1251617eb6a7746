use {
    crate::{LineFormat, LogError, Logger, LoggerBuilder},
    std::{path::Path, sync::OnceLock},
};

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger used by the `info!`, `error!` and `fatal!` macros
/// when no logger is named.
///
/// It starts in stdout-only mode with a 10 MB archive threshold; point it at
/// a file with [`init`] and tune it with the [`Logger`] setters.
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(|| Logger::from_parts(LoggerBuilder::stdout().policy, None))
}

/// Point the process-wide logger at `path`, or at standard output only when
/// `path` is empty. Lines are mirrored to standard output when `stdout` is
/// set.
pub fn init<P: AsRef<Path>>(path: P, line_format: LineFormat, stdout: bool) -> Result<(), LogError> {
    global().reinit(path, line_format, stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_logger_is_shared_and_writable() {
        assert!(std::ptr::eq(global(), global()));
        crate::info!("global {}", "logger");
        crate::error!("global error");
    }
}
