use {
    crate::{monitor, Level, LogError, Logger, Policy, COMPRESSED_EXTENSIONS},
    chrono::{DateTime, FixedOffset},
    std::{
        ffi::OsString,
        fs,
        io,
        panic::Location,
        path::{Path, PathBuf},
        sync::PoisonError,
    },
};

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

/// The active log file: an append handle plus the absolute path it was
/// opened at. Replaced wholesale on every rotation.
pub(crate) struct Destination {
    pub(crate) path: PathBuf,
    pub(crate) file: fs::File,
}

impl Destination {
    /// Open `path` for appending, creating the file and any missing parent
    /// directories.
    pub(crate) fn open(path: &Path, policy: &Policy) -> Result<Self, LogError> {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let mut open_options = fs::OpenOptions::new();
        open_options.append(true).create(true);
        #[cfg(unix)]
        open_options.mode(0o660);

        if let Some(parent) = path.parent() {
            if !parent.is_dir() {
                fs::create_dir_all(parent)
                    .map_err(|err| LogError::CreateDirectoryFailed(parent.to_path_buf(), err.to_string()))?;
            }
        }

        let file = open_options
            .open(&path)
            .map_err(|err| LogError::CreateFileFailed(path.clone(), err.to_string()))?;

        set_permissions(&path, policy.file_mode)?;

        Ok(Destination { path, file })
    }
}

/// Set the permissions for a file when a file mode has been configured.
///
/// On non-Unix systems this prints a warning and does nothing.
pub(crate) fn set_permissions(path: &Path, file_mode: Option<u32>) -> Result<(), LogError> {
    if let Some(mode) = file_mode {
        #[cfg(unix)]
        {
            let perms = fs::Permissions::from_mode(mode);
            fs::set_permissions(path, perms).map_err(|err| LogError::SetFilePermissionsError {
                path: path.to_path_buf(),
                error: err.to_string(),
            })?
        }
        #[cfg(not(unix))]
        {
            let _ = (path, mode);
            eprintln!("Warning: Setting file permissions is not supported on non-Unix platforms");
        }
    }
    Ok(())
}

/// Append `.extension` to the full file name (`a.log` -> `a.log.gzip`).
pub(crate) fn with_appended_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Timestamp and same-second index of the last archive a logger produced.
pub(crate) type LastArchive = Option<(String, u64)>;

/// Pick the archive path for a log file last written at `modified`:
/// `<dir>/YYYY-MM-DD_HH-MM-SS.log`. Further archives from the same second get
/// an index one above the previous one (`..._HH-MM-SS-1.log`), so names keep
/// sorting in rotation order even after retention removed lower indices, and
/// an existing archive or its compressed form is never overwritten.
///
/// Returns the path along with the key to remember as `last`.
pub(crate) fn archive_path(
    log_path: &Path,
    modified: DateTime<FixedOffset>,
    last: &LastArchive,
) -> (PathBuf, (String, u64)) {
    let directory = log_path.parent().unwrap_or_else(|| Path::new(""));
    let stamp = modified.format("%Y-%m-%d_%H-%M-%S").to_string();
    let candidate = |index: u64| match index {
        0 => directory.join(format!("{stamp}.log")),
        index => directory.join(format!("{stamp}-{index}.log")),
    };

    let mut index = match last {
        Some((last_stamp, last_index)) if *last_stamp == stamp => last_index + 1,
        _ => 0,
    };
    while is_taken(&candidate(index)) {
        index += 1;
    }
    (candidate(index), (stamp, index))
}

fn is_taken(candidate: &Path) -> bool {
    candidate.exists()
        || COMPRESSED_EXTENSIONS
            .iter()
            .any(|extension| with_appended_extension(candidate, extension).exists())
}

impl Logger {
    /// Archive the active file now, whatever its size or age.
    ///
    /// Meant for schedulers that want archives cut at fixed times (e.g. at
    /// midnight) instead of on the first write of the day. Returns the
    /// archive path, or `None` in stdout-only mode or when the active file
    /// does not exist.
    pub fn force_archive_now(&self) -> Result<Option<PathBuf>, LogError> {
        self.rotate(true)
    }

    /// Rename the active file aside and reopen a fresh one at the same path.
    ///
    /// Runs under the rotation lock and re-evaluates the archive condition
    /// first, so writers racing past the monitor produce one archive. The
    /// archive is handed to the background compressor only after the new
    /// file has been swapped in and the lock released.
    pub(crate) fn rotate(&self, force: bool) -> Result<Option<PathBuf>, LogError> {
        let mut last = self.rotation.lock().unwrap_or_else(PoisonError::into_inner);
        let policy = self.policy();
        let Some(log_path) = self.path() else {
            return Ok(None);
        };

        let metadata = match fs::metadata(&log_path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(LogError::FileIOError(err)),
        };
        if !force && !monitor::is_due(&metadata, &policy) {
            return Ok(None);
        }

        let modified = policy.localize(metadata.modified()?);
        let (archive, key) = archive_path(&log_path, modified, &last);

        if let Err(err) = fs::rename(&log_path, &archive) {
            let err = LogError::RenameFileError {
                from: log_path,
                to: archive,
                error: err.to_string(),
            };
            self.emit(
                Level::Error,
                Location::caller(),
                format_args!("Error for rename overload log file: {err}"),
            );
            return Err(err);
        }
        *last = Some(key);

        // Writers holding the old handle keep appending to the archive until
        // the swap below, which waits for them.
        let destination = match Destination::open(&log_path, &policy) {
            Ok(destination) => destination,
            Err(err) => {
                self.emit(
                    Level::Error,
                    Location::caller(),
                    format_args!("Error for reopening log file after archiving: {err}"),
                );
                return Err(err);
            }
        };
        self.swap_destination(Some(destination));
        drop(last);

        self.compressor.schedule(archive.clone(), policy);
        Ok(Some(archive))
    }
}
