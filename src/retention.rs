use {
    crate::LogError,
    regex::Regex,
    std::{
        fs, io,
        path::{Path, PathBuf},
        sync::OnceLock,
    },
};

/// Timestamp and same-second index of an archive file name.
type ArchiveKey = (String, u64);

/// Scan `directory` for archives: `2025-04-01_19-55-02.log`, an optional
/// same-second index (`-1`), and an optional compression extension.
fn scan(directory: &Path) -> Result<Vec<(ArchiveKey, PathBuf)>, LogError> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"^(\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2})(?:-(\d+))?\.log(?:\.gzip|\.xz)?$"))
        .as_ref()
        .map_err(|err| LogError::InternalError(err.to_string()))?;
    let files = fs::read_dir(directory).map_err(|err| LogError::InternalError(err.to_string()))?;

    let mut archives = Vec::new();
    for file in files.flatten() {
        if !file.file_type().map(|kind| kind.is_file()).unwrap_or(false) {
            continue;
        }
        let file_name = file.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if let Some(captures) = pattern.captures(name) {
            let stamp = captures[1].to_string();
            let index = captures
                .get(2)
                .and_then(|index| index.as_str().parse::<u64>().ok())
                .unwrap_or(0);
            archives.push(((stamp, index), file.path()));
        }
    }
    Ok(archives)
}

/// List every archive in `directory`, oldest first.
pub(crate) fn list_archives(directory: &Path) -> Result<Vec<PathBuf>, LogError> {
    let mut archives = scan(directory)?;
    // Sort by timestamp, then by same-second index
    archives.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(archives.into_iter().map(|(_, path)| path).collect())
}

/// Remove the oldest archives so that at most `max_keep_files` remain.
/// Returns the removed paths.
pub(crate) fn prune(directory: &Path, max_keep_files: u64) -> Result<Vec<PathBuf>, LogError> {
    let archives = list_archives(directory)?;
    let keep = usize::try_from(max_keep_files).unwrap_or(usize::MAX);
    let excess = archives.len().saturating_sub(keep);

    let mut removed = Vec::with_capacity(excess);
    for path in archives.into_iter().take(excess) {
        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            // Another archive task got there first.
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => eprintln!("Failed to remove old log file '{}': {}", path.display(), err),
        }
    }
    Ok(removed)
}
