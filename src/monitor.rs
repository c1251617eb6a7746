use {
    crate::{Logger, Policy},
    std::{fs, sync::PoisonError},
};

impl Logger {
    /// Check whether the active file is due for archiving.
    ///
    /// The file is due when it holds at least the configured maximum size, or
    /// when it was last written on an earlier calendar day than today. Empty
    /// files are never due. Stdout-only loggers never rotate. A failed `stat`
    /// is reported on standard error and treated as not due.
    ///
    /// This runs before every write and costs a single `stat`; it does not
    /// take the rotation lock.
    pub fn should_rotate(&self) -> bool {
        let metadata = {
            let destination = self.destination.read().unwrap_or_else(PoisonError::into_inner);
            let Some(destination) = destination.as_ref() else {
                return false;
            };
            match fs::metadata(&destination.path) {
                Ok(metadata) => metadata,
                Err(err) => {
                    eprintln!("Failed to stat log file '{}': {}", destination.path.display(), err);
                    return false;
                }
            }
        };
        is_due(&metadata, &self.policy())
    }
}

/// Evaluate the archive condition for a file's metadata under `policy`.
pub(crate) fn is_due(metadata: &fs::Metadata, policy: &Policy) -> bool {
    let size = metadata.len();
    if size == 0 {
        return false;
    }
    if let Ok(modified) = metadata.modified() {
        // A file last written yesterday counts as full.
        if policy.localize(modified).date_naive() != policy.now().date_naive() {
            return true;
        }
    }
    size >= policy.max_size
}
