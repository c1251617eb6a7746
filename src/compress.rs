use {
    crate::{
        retention,
        rotation::{set_permissions, with_appended_extension},
        Compression, LogError, Logger, Policy,
    },
    flate2::GzBuilder,
    std::{
        fs,
        io::{self, BufReader, BufWriter, Read},
        mem,
        path::{Path, PathBuf},
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc, Mutex, MutexGuard, PoisonError,
        },
        thread::{self, JoinHandle},
    },
};

/// What to do with archive tasks that are still running at shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// Let every pending task finish.
    Wait,
    /// Ask pending tasks to stop and wait for them to do so. A cancelled task
    /// removes its partial output and leaves the uncompressed archive in place.
    Cancel,
    /// Return at once with the outcomes already known. Running tasks are
    /// detached and finish on their own.
    Abandon,
}

/// One background archive task: compression of a freshly rotated file
/// followed by retention pruning.
struct ArchiveTask {
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<Result<PathBuf, LogError>>,
}

#[derive(Default)]
struct Tasks {
    running: Vec<ArchiveTask>,
    // Outcomes of tasks joined while scheduling later ones.
    finished: Vec<Result<PathBuf, LogError>>,
}

impl Tasks {
    /// Join the tasks that are done so the running list stays short.
    fn settle(&mut self) {
        let (done, running): (Vec<_>, Vec<_>) =
            mem::take(&mut self.running).into_iter().partition(|task| task.handle.is_finished());
        self.running = running;
        self.finished.extend(done.into_iter().map(join));
    }
}

/// Tracks background archive tasks so they can be awaited or cancelled.
#[derive(Default)]
pub(crate) struct Compressor {
    tasks: Mutex<Tasks>,
}

impl Compressor {
    /// Start post-processing `archive` on a background thread. Nothing is
    /// started when the policy neither compresses nor prunes.
    pub(crate) fn schedule(&self, archive: PathBuf, policy: Arc<Policy>) {
        if policy.compression.is_none() && policy.max_keep_files.is_none() {
            return;
        }
        let cancel = Arc::new(AtomicBool::new(false));
        let task_cancel = Arc::clone(&cancel);
        let spawned = thread::Builder::new()
            .name("rotalog-archive".to_string())
            .spawn(move || process_archive(archive, &policy, &task_cancel));
        match spawned {
            Ok(handle) => {
                let mut tasks = self.lock();
                tasks.settle();
                tasks.running.push(ArchiveTask { cancel, handle });
            }
            Err(err) => eprintln!("Failed to start archive task: {}", err),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tasks> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take(&self) -> Tasks {
        mem::take(&mut *self.lock())
    }

    fn pending(&self) -> usize {
        self.lock().running.iter().filter(|task| !task.handle.is_finished()).count()
    }
}

fn join(task: ArchiveTask) -> Result<PathBuf, LogError> {
    task.handle
        .join()
        .unwrap_or_else(|_| Err(LogError::InternalError("archive task panicked".to_string())))
}

impl Logger {
    /// Block until every scheduled archive task has finished and return
    /// their outcomes: the final archive path
    /// (`.log.gzip` when compressed) or the error that stopped the task.
    ///
    /// Each outcome is returned once; a later call only reports tasks
    /// scheduled since.
    pub fn wait_compressions(&self) -> Vec<Result<PathBuf, LogError>> {
        self.shutdown(Shutdown::Wait)
    }

    /// Number of archive tasks still running.
    pub fn pending_compressions(&self) -> usize {
        self.compressor.pending()
    }

    /// Settle background archive tasks before the process exits.
    ///
    /// With [`Shutdown::Abandon`] only the outcomes of tasks that already
    /// finished are returned.
    pub fn shutdown(&self, mode: Shutdown) -> Vec<Result<PathBuf, LogError>> {
        let Tasks { running, mut finished } = self.compressor.take();
        match mode {
            Shutdown::Wait => finished.extend(running.into_iter().map(join)),
            Shutdown::Cancel => {
                for task in &running {
                    task.cancel.store(true, Ordering::Relaxed);
                }
                finished.extend(running.into_iter().map(join));
            }
            Shutdown::Abandon => {
                let (done, detached): (Vec<_>, Vec<_>) =
                    running.into_iter().partition(|task| task.handle.is_finished());
                finished.extend(done.into_iter().map(join));
                // Dropping a handle detaches its thread.
                drop(detached);
            }
        }
        finished
    }
}

/// Compress (when configured) and then prune. Failures are reported on
/// standard error and returned; they never stop the process.
fn process_archive(archive: PathBuf, policy: &Policy, cancel: &AtomicBool) -> Result<PathBuf, LogError> {
    let archived = match &policy.compression {
        Some(compression) => compress(&archive, compression, policy.file_mode, cancel).inspect_err(|err| {
            eprintln!("Failed to compress log archive '{}': {}", archive.display(), err);
        })?,
        None => archive,
    };

    if let (Some(max_keep_files), Some(directory)) = (policy.max_keep_files, archived.parent()) {
        if let Err(err) = retention::prune(directory, max_keep_files) {
            eprintln!("Failed to remove old log archives in '{}': {}", directory.display(), err);
        }
    }
    Ok(archived)
}

/// Compress `archive` into `<archive>.<extension>` and delete the original.
///
/// Output goes to a `.tmp` file that is renamed into place only once the
/// stream is complete and synced, so an interrupted run never leaves a
/// truncated archive behind. On any failure the temp file is removed and the
/// uncompressed archive is kept.
pub(crate) fn compress(
    archive: &Path,
    compression: &Compression,
    file_mode: Option<u32>,
    cancel: &AtomicBool,
) -> Result<PathBuf, LogError> {
    let compressed_path = with_appended_extension(archive, compression.get_extension());
    let temp_path = with_appended_extension(&compressed_path, "tmp");

    // The mode is applied before the rename: once the compressed name exists
    // the only step left is removing the original.
    let written = write_compressed(archive, &temp_path, compression, cancel)
        .and_then(|()| set_permissions(&temp_path, file_mode))
        .and_then(|()| {
            fs::rename(&temp_path, &compressed_path).map_err(|err| LogError::RenameFileError {
                from: temp_path.clone(),
                to: compressed_path.clone(),
                error: err.to_string(),
            })
        });
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    fs::remove_file(archive).map_err(LogError::FileIOError)?;
    Ok(compressed_path)
}

fn write_compressed(
    archive: &Path,
    temp_path: &Path,
    compression: &Compression,
    cancel: &AtomicBool,
) -> Result<(), LogError> {
    let infile = fs::File::open(archive).map_err(LogError::FileIOError)?;
    let mut reader = BufReader::new(Cancellable { inner: infile, cancel });
    let outfile = fs::File::create(temp_path).map_err(LogError::FileIOError)?;
    let writer = BufWriter::new(outfile);

    let streamed = match compression {
        Compression::Gzip => {
            let name = archive
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut encoder = GzBuilder::new()
                .filename(name)
                .write(writer, flate2::Compression::default());
            io::copy(&mut reader, &mut encoder).and_then(|_| encoder.finish())
        }
        #[cfg(feature = "xz")]
        Compression::XZ => {
            let mut writer = writer;
            lzma_rs::xz_compress(&mut reader, &mut writer).map(|()| writer)
        }
    };

    let writer = match streamed {
        Ok(writer) => writer,
        Err(_) if cancel.load(Ordering::Relaxed) => return Err(LogError::CompressionCancelled(archive.to_path_buf())),
        Err(err) => return Err(LogError::FileIOError(err)),
    };
    let outfile = writer.into_inner().map_err(|err| LogError::FileIOError(err.into_error()))?;
    outfile.sync_all()?;
    Ok(())
}

/// Reader that fails once its cancel flag is raised, stopping the stream at
/// the next chunk boundary.
struct Cancellable<'a, R> {
    inner: R,
    cancel: &'a AtomicBool,
}

impl<R: Read> Read for Cancellable<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.cancel.load(Ordering::Relaxed) {
            return Err(io::Error::other("archive compression cancelled"));
        }
        self.inner.read(buf)
    }
}
