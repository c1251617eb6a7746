use {
    crate::{compress::Compressor, format, rotation::{Destination, LastArchive}, LineFormat, LogError, Policy, RotationSize},
    std::{
        fmt,
        io::{self, Write as _},
        panic::Location,
        path::Path,
        sync::{Arc, Mutex, PoisonError, RwLock},
    },
};

/// Severity of a log line. Each level writes with its own prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
    /// Terminates the process once the line is written.
    Fatal,
}

impl Level {
    pub fn prefix(&self) -> &'static str {
        match self {
            Level::Info => "[Info]  ",
            Level::Error => "[Error] ",
            Level::Fatal => "[Fatal] ",
        }
    }
}

/// A leveled logger writing to a file, standard output, or both.
///
/// Before each write the logger checks whether the active file is due for
/// archiving (size threshold reached, or last written on an earlier day) and
/// if so archives it on the calling thread. Writes never return errors;
/// failures are reported on standard error.
pub struct Logger {
    pub(crate) policy: RwLock<Arc<Policy>>,
    pub(crate) destination: RwLock<Option<Destination>>,
    /// Held across re-check, rename, reopen and swap. Holds the name of the
    /// last archive produced.
    pub(crate) rotation: Mutex<LastArchive>,
    pub(crate) compressor: Compressor,
}

impl Logger {
    pub(crate) fn from_parts(policy: Policy, destination: Option<Destination>) -> Self {
        Logger {
            policy: RwLock::new(Arc::new(policy)),
            destination: RwLock::new(destination),
            rotation: Mutex::new(None),
            compressor: Compressor::default(),
        }
    }

    /// Current policy snapshot.
    pub(crate) fn policy(&self) -> Arc<Policy> {
        self.policy.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn update_policy(&self, update: impl FnOnce(&mut Policy)) {
        let mut guard = self.policy.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = Policy::clone(&guard);
        update(&mut next);
        *guard = Arc::new(next);
    }

    pub(crate) fn swap_destination(&self, destination: Option<Destination>) {
        *self.destination.write().unwrap_or_else(PoisonError::into_inner) = destination;
    }

    /// Path of the active file, `None` in stdout-only mode.
    pub fn path(&self) -> Option<std::path::PathBuf> {
        self.destination
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|destination| destination.path.clone())
    }

    /// Re-target the logger. Any open file is closed; an empty path switches
    /// to stdout-only mode. If the new file cannot be opened the failure is
    /// reported, the logger continues in stdout-only mode and the error is
    /// returned.
    pub fn reinit<P: AsRef<Path>>(&self, path: P, line_format: LineFormat, stdout: bool) -> Result<(), LogError> {
        let _guard = self.rotation.lock().unwrap_or_else(PoisonError::into_inner);
        self.update_policy(|policy| {
            policy.line_format = line_format;
            policy.stdout = stdout;
        });
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            self.swap_destination(None);
            return Ok(());
        }
        match Destination::open(path, &self.policy()) {
            Ok(destination) => {
                self.swap_destination(Some(destination));
                Ok(())
            }
            Err(err) => {
                eprintln!("Failed to open log file '{}': {}", path.display(), err);
                self.swap_destination(None);
                Err(err)
            }
        }
    }

    /// Get the archive threshold in bytes.
    pub fn max_size(&self) -> u64 {
        self.policy().max_size
    }

    pub fn set_max_size(&self, max_size: RotationSize) {
        self.update_policy(|policy| policy.max_size = max_size.bytes());
    }

    pub fn set_max_size_kb(&self, kb: u64) {
        self.set_max_size(RotationSize::KB(kb));
    }

    pub fn set_max_size_mb(&self, mb: u64) {
        self.set_max_size(RotationSize::MB(mb));
    }

    /// Enable or disable compression of archives created from now on.
    pub fn set_compression(&self, compression: Option<crate::Compression>) {
        self.update_policy(|policy| policy.compression = compression);
    }

    pub fn set_line_format(&self, line_format: LineFormat) {
        self.update_policy(|policy| policy.line_format = line_format);
    }

    pub fn set_stdout(&self, stdout: bool) {
        self.update_policy(|policy| policy.stdout = stdout);
    }

    /// Write one line at `level`, attributed to `location`.
    ///
    /// This is the primitive behind every other write method. Wrappers that
    /// log on behalf of their own caller can pass that caller's location.
    pub fn log(&self, level: Level, location: &Location<'_>, args: fmt::Arguments<'_>) {
        self.archive_if_due();
        self.emit(level, location, args);
    }

    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, Location::caller(), format_args!("{message}"));
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, Location::caller(), args);
    }

    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, Location::caller(), format_args!("{message}"));
    }

    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, Location::caller(), args);
    }

    /// Write the line, then terminate the process with exit status 1.
    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) -> ! {
        self.fatal_at(Location::caller(), format_args!("{message}"))
    }

    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.fatal_at(Location::caller(), args)
    }

    fn fatal_at(&self, location: &Location<'_>, args: fmt::Arguments<'_>) -> ! {
        self.log(Level::Fatal, location, args);
        let _ = io::stdout().flush();
        std::process::exit(1)
    }

    fn archive_if_due(&self) {
        if self.should_rotate() {
            // Failures were already reported by the coordinator.
            let _ = self.rotate(false);
        }
    }

    /// Format and write one line to every sink, skipping the archive check.
    pub(crate) fn emit(&self, level: Level, location: &Location<'_>, args: fmt::Arguments<'_>) {
        let policy = self.policy();
        let line = format::render(level.prefix(), &policy.line_format, policy.now(), location, args);
        let _ = self.write_sinks(line.as_bytes(), policy.stdout);
    }

    /// Write raw bytes to the file sink, then standard output. Each sink is
    /// attempted regardless of the other; the file sink's error is returned.
    fn write_sinks(&self, buf: &[u8], stdout: bool) -> io::Result<()> {
        let mut result = Ok(());
        if let Some(destination) = self.destination.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            if let Err(err) = (&destination.file).write_all(buf) {
                eprintln!("Failed to write log file '{}': {}", destination.path.display(), err);
                result = Err(err);
            }
        }
        if stdout {
            let _ = io::stdout().lock().write_all(buf);
        }
        result
    }

    /// Write preformatted bytes, archiving first when due. Used when the
    /// logger serves as a plain `io::Write` sink.
    fn write_raw(&self, buf: &[u8]) -> io::Result<()> {
        self.archive_if_due();
        self.write_sinks(buf, self.policy().stdout)
    }
}

impl io::Write for &Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_raw(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

impl io::Write for Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self).flush()
    }
}
