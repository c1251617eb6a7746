//! # rotalog
//!
//! rotalog is a leveled logger that appends timestamped lines to a file,
//! optionally mirrors them to standard output, and archives the active file
//! once it grows past a size threshold or was last written on an earlier day.
//! Archived files are named after the moment they were last written
//! (`2025-04-01_19-55-02.log`) and can be gzip-compressed in the background
//! while writers keep logging to a fresh file at the original path.
//!
//! Rotation is checked before every write. Any number of threads may share a
//! [`Logger`]; the first writer that sees the file is due performs the
//! rotation, everyone else re-checks under the rotation lock and carries on.
//!
//! ## Example
//!
//! ```rust
//! use rotalog::{Compression, LineFormat, LoggerBuilder, RotationSize};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let logger = LoggerBuilder::new("./logs/app.log")
//!         .max_size(RotationSize::MB(10))
//!         .compression(Compression::Gzip) // Archives become 2025-04-01_19-55-02.log.gzip
//!         .line_format(LineFormat::DETAILED)
//!         .mirror_stdout(true)
//!         .build()?;
//!
//!     logger.info("service started");
//!     rotalog::info!(logger => "listening on port {}", 8080);
//!     rotalog::error!(logger => "upstream {} unreachable", "db-1");
//!
//!     // Let pending compressions finish before exiting.
//!     logger.wait_compressions();
//!     Ok(())
//! }
//! ```
//!
//! The process-wide logger starts in stdout-only mode and can be pointed at a
//! file with [`init`]:
//!
//! ```rust
//! rotalog::init("./logs/global.log", rotalog::LineFormat::STANDARD, false)?;
//! rotalog::global().set_max_size_kb(500);
//! rotalog::info!("Hello {}", "World!");
//! # Ok::<(), rotalog::LogError>(())
//! ```
use {
    chrono::{DateTime, FixedOffset, Local, Utc},
    std::{
        path::{Path, PathBuf},
        time::SystemTime,
    },
};

#[cfg(feature = "tracing")]
mod appender;
mod compress;
mod format;
mod global;
mod logger;
mod monitor;
mod retention;
mod rotation;

pub use {
    compress::Shutdown,
    format::LineFormat,
    global::{global, init},
    logger::{Level, Logger},
};

/// Defines size thresholds for archiving the active log file in various units.
///
/// Once the active file holds at least this many bytes, the next write
/// archives it and starts a fresh file.
///
/// * `Bytes` - Direct byte count (e.g., 1048576 bytes)
/// * `KB` - Kilobytes (1 KB = 1024 bytes)
/// * `MB` - Megabytes (1 MB = 1024 KB)
/// * `GB` - Gigabytes (1 GB = 1024 MB)
///
/// # Examples
/// ```
/// use rotalog::{LoggerBuilder, RotationSize};
///
/// // Archive when the file reaches 100 MB
/// let logger = LoggerBuilder::new("./logs/large.log")
///     .max_size(RotationSize::MB(100))
///     .build()
///     .unwrap();
/// assert_eq!(logger.max_size(), 100 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationSize {
    /// Raw byte count
    Bytes(u64),
    /// Kilobytes (1 KB = 1024 bytes)
    KB(u64),
    /// Megabytes (1 MB = 1024 KB = 1,048,576 bytes)
    MB(u64),
    /// Gigabytes (1 GB = 1024 MB = 1,073,741,824 bytes)
    GB(u64),
}

impl RotationSize {
    /// Get the threshold in bytes.
    pub fn bytes(&self) -> u64 {
        match self {
            RotationSize::Bytes(b) => *b,
            RotationSize::KB(kb) => kb.saturating_mul(1024),
            RotationSize::MB(mb) => mb.saturating_mul(1024 * 1024),
            RotationSize::GB(gb) => gb.saturating_mul(1024 * 1024 * 1024),
        }
    }
}

/// Specifies the compression algorithm applied to archived log files.
///
/// Compression runs on a background thread after the archive has been
/// renamed aside. The compressed file keeps the archive name and adds the
/// algorithm's extension (`.gzip` for Gzip).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Gzip compression. The gzip header carries the archive's file name, so
    /// `gunzip -N` restores `2025-04-01_19-55-02.log`.
    Gzip,
    /// XZ compression via `lzma-rs`. Slower, smaller output, no embedded name.
    #[cfg(feature = "xz")]
    XZ,
}

impl Compression {
    /// Get the extension for the compressed log file.
    fn get_extension(&self) -> &'static str {
        match self {
            Compression::Gzip => "gzip",
            #[cfg(feature = "xz")]
            Compression::XZ => "xz",
        }
    }
}

/// Every extension a compressed archive may carry, whichever algorithm is
/// configured right now.
const COMPRESSED_EXTENSIONS: &[&str] = &["gzip", "xz"];

/// Specifies the time zone used for day-boundary checks and archive names.
///
/// # Examples
/// ```
/// use rotalog::TimeZone;
/// use chrono::FixedOffset;
///
/// // Use UTC time for global deployments
/// let utc = TimeZone::UTC;
///
/// // Use local system time zone
/// let local = TimeZone::Local;
///
/// // Use a fixed offset for a specific region (e.g., UTC+8 for China)
/// let china = TimeZone::Fix(FixedOffset::east_opt(8 * 3600).unwrap());
/// ```
#[derive(Debug, Clone)]
pub enum TimeZone {
    /// Use UTC time zone.
    UTC,
    /// Use the system's local time zone, resolved when the logger is built.
    Local,
    /// Use a fixed time zone offset.
    Fix(FixedOffset),
}

impl TimeZone {
    fn offset(&self) -> FixedOffset {
        match self {
            TimeZone::UTC => Utc::now().fixed_offset().offset().to_owned(),
            TimeZone::Local => Local::now().offset().to_owned(),
            TimeZone::Fix(fixed_offset) => *fixed_offset,
        }
    }
}

/// Rotation policy shared by the write path, the rotation coordinator and
/// the background archive tasks.
///
/// A `Logger` never mutates a policy in place: setters build a new one and
/// swap it in, so every write and every rotation sees one consistent
/// snapshot.
#[derive(Debug, Clone)]
pub(crate) struct Policy {
    /// The active file is archived once it holds at least this many bytes.
    max_size: u64,
    /// Mirror every line to standard output.
    stdout: bool,
    /// Compression applied to archives, `None` keeps plain `.log` archives.
    compression: Option<Compression>,
    /// Decorations written in front of every message.
    line_format: LineFormat,
    /// Offset used for line timestamps, day checks and archive names.
    time_zone: FixedOffset,
    /// The maximum number of archives to keep in the log directory.
    max_keep_files: Option<u64>,
    /// The file permissions to set on newly created log files (Unix-like
    /// systems only), in octal notation (e.g., 0o644 for rw-r--r--). When
    /// unset, new files are created with 0o660 minus the process umask.
    file_mode: Option<u32>,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            max_size: RotationSize::MB(10).bytes(),
            stdout: false,
            compression: None,
            line_format: LineFormat::default(),
            time_zone: TimeZone::Local.offset(),
            max_keep_files: None,
            file_mode: None,
        }
    }
}

impl Policy {
    /// Get the current time in the configured time zone.
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.time_zone)
    }

    /// Convert a file timestamp into the configured time zone.
    fn localize(&self, time: SystemTime) -> DateTime<FixedOffset> {
        DateTime::<Utc>::from(time).with_timezone(&self.time_zone)
    }
}

/// Errors that can occur when using the logger.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("Failed to create directory '{0}': {1}")]
    CreateDirectoryFailed(PathBuf, String),
    #[error("Failed to create file '{0}': {1}")]
    CreateFileFailed(PathBuf, String),
    #[error("Failed to rename file from '{from}' to '{to}': {error}")]
    RenameFileError { from: PathBuf, to: PathBuf, error: String },
    #[error("File IO error: {0}")]
    FileIOError(#[from] std::io::Error),
    #[error("Failed to set file permissions for '{path}': {error}")]
    SetFilePermissionsError { path: PathBuf, error: String },
    #[error("Compression of '{0}' was cancelled")]
    CompressionCancelled(PathBuf),
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Provides a fluent interface for configuring [`Logger`] instances.
///
/// # Default Configuration
///
/// If not explicitly configured, a logger uses these defaults:
/// * Archive at 10 MB, or on the first write of a new day
/// * Local system time zone
/// * `[Info]  2025/04/01 19:55:02 message` line layout
/// * No compression, no standard output mirroring
/// * Keep all archives
///
/// # Examples
///
/// ```rust
/// use rotalog::{Compression, LoggerBuilder, RotationSize, TimeZone};
///
/// let logger = LoggerBuilder::new("./logs/app.log")
///     .max_size(RotationSize::KB(500))
///     .time_zone(TimeZone::UTC)        // Name archives in UTC
///     .compression(Compression::Gzip)  // Compress archives
///     .max_keep_files(24)              // Drop the oldest beyond 24 archives
///     .build()
///     .unwrap();
/// ```
///
/// An empty path, or [`LoggerBuilder::stdout`], gives a stdout-only logger
/// that never rotates:
///
/// ```rust
/// use rotalog::LoggerBuilder;
///
/// let logger = LoggerBuilder::stdout().build().unwrap();
/// assert!(logger.path().is_none());
/// ```
pub struct LoggerBuilder {
    path: Option<PathBuf>,
    policy: Policy,
}

impl LoggerBuilder {
    /// Create a builder for a logger appending to `path`.
    /// An empty path selects stdout-only mode.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let stdout_only = path.as_os_str().is_empty();
        LoggerBuilder {
            path: (!stdout_only).then(|| path.to_path_buf()),
            policy: Policy {
                stdout: stdout_only,
                ..Policy::default()
            },
        }
    }

    /// Create a builder for a logger that only writes to standard output.
    pub fn stdout() -> Self {
        Self::new("")
    }

    /// Set the size at which the active file is archived.
    pub fn max_size(self, max_size: RotationSize) -> Self {
        Self {
            policy: Policy {
                max_size: max_size.bytes(),
                ..self.policy
            },
            ..self
        }
    }

    /// Mirror every line to standard output as well.
    pub fn mirror_stdout(self, stdout: bool) -> Self {
        Self {
            policy: Policy { stdout, ..self.policy },
            ..self
        }
    }

    /// Set the compression type for archived files.
    pub fn compression(self, compression: Compression) -> Self {
        Self {
            policy: Policy {
                compression: Some(compression),
                ..self.policy
            },
            ..self
        }
    }

    /// Set the decorations written in front of every message.
    pub fn line_format(self, line_format: LineFormat) -> Self {
        Self {
            policy: Policy {
                line_format,
                ..self.policy
            },
            ..self
        }
    }

    /// Set the time zone for line timestamps and archive names.
    pub fn time_zone(self, time_zone: TimeZone) -> Self {
        Self {
            policy: Policy {
                time_zone: time_zone.offset(),
                ..self.policy
            },
            ..self
        }
    }

    /// Set the maximum number of archives to keep.
    pub fn max_keep_files(self, max_keep_files: u64) -> Self {
        Self {
            policy: Policy {
                max_keep_files: Some(max_keep_files),
                ..self.policy
            },
            ..self
        }
    }

    /// Set the file permissions for log files (Unix-like systems only).
    /// This sets the file mode bits in octal notation like when using chmod.
    /// For example, 0o644 for rw-r--r-- permissions.
    pub fn file_mode(self, mode: u32) -> Self {
        Self {
            policy: Policy {
                file_mode: Some(mode),
                ..self.policy
            },
            ..self
        }
    }

    /// Build the logger, creating the log directory and opening the active
    /// file in append mode.
    pub fn build(self) -> Result<Logger, LogError> {
        let destination = match &self.path {
            Some(path) => Some(rotation::Destination::open(path, &self.policy)?),
            None => None,
        };
        Ok(Logger::from_parts(self.policy, destination))
    }
}

/// Log a message at info level.
///
/// Writes to the process-wide logger, or to an explicit one with
/// `info!(logger => ...)`.
///
/// ```rust
/// let logger = rotalog::LoggerBuilder::stdout().build().unwrap();
/// rotalog::info!(logger => "cache warmed in {} ms", 42);
/// rotalog::info!("using the global logger");
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr => $($arg:tt)+) => {
        $logger.infof(::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::global().infof(::std::format_args!($($arg)+))
    };
}

/// Log a message at error level.
#[macro_export]
macro_rules! error {
    ($logger:expr => $($arg:tt)+) => {
        $logger.errorf(::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::global().errorf(::std::format_args!($($arg)+))
    };
}

/// Log a message at fatal level, then terminate the process with status 1.
#[macro_export]
macro_rules! fatal {
    ($logger:expr => $($arg:tt)+) => {
        $logger.fatalf(::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::global().fatalf(::std::format_args!($($arg)+))
    };
}
