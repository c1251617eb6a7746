mod common;

use {
    common::archives,
    flate2::read::GzDecoder,
    rotalog::{Compression, LineFormat, LogError, LoggerBuilder, RotationSize, Shutdown},
    std::{fs, io::Read, path::PathBuf, thread, time::Duration},
};

fn gunzip(path: &std::path::Path) -> (String, Option<Vec<u8>>) {
    let mut decoder = GzDecoder::new(fs::File::open(path).unwrap());
    let mut content = String::new();
    decoder.read_to_string(&mut content).unwrap();
    let name = decoder.header().and_then(|header| header.filename()).map(<[u8]>::to_vec);
    (content, name)
}

#[test]
fn compression_enabled_after_the_first_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LoggerBuilder::new(&path)
        .max_size(RotationSize::Bytes(1))
        .line_format(LineFormat::NONE)
        .build()
        .unwrap();

    logger.info("first");
    logger.set_compression(Some(Compression::Gzip));
    logger.info("latest");

    let results = logger.wait_compressions();
    assert_eq!(results.len(), 1);
    let compressed = results.into_iter().next().unwrap().unwrap();

    assert_eq!(archives(dir.path(), ".gzip"), [compressed.clone()]);
    assert!(archives(dir.path(), ".log").is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), "[Info]  latest\n");

    let (content, name) = gunzip(&compressed);
    assert_eq!(content, "[Info]  first\n");
    let expected_name = compressed.file_stem().unwrap().to_string_lossy().into_owned();
    assert_eq!(name, Some(expected_name.into_bytes()));
}

#[test]
fn every_archive_is_replaced_by_identical_gzip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LoggerBuilder::new(&path)
        .max_size(RotationSize::Bytes(200))
        .compression(Compression::Gzip)
        .line_format(LineFormat::NONE)
        .build()
        .unwrap();

    let mut written = String::new();
    for i in 0..40 {
        let message = format!("entry {i:02} {}", "y".repeat(40));
        written.push_str(&format!("[Info]  {message}\n"));
        logger.info(message);
    }

    let results = logger.wait_compressions();
    assert!(!results.is_empty());
    assert!(results.iter().all(Result::is_ok));
    assert!(archives(dir.path(), ".log").is_empty());

    let mut parts: Vec<String> = archives(dir.path(), ".gzip").iter().map(|path| gunzip(path).0).collect();
    assert_eq!(parts.len(), results.len());
    parts.sort();
    let mut restored = parts.concat();
    restored.push_str(&fs::read_to_string(&path).unwrap());
    assert_eq!(restored, written);
}

#[test]
fn retention_keeps_the_newest_archives() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LoggerBuilder::new(&path)
        .max_size(RotationSize::Bytes(1))
        .compression(Compression::Gzip)
        .max_keep_files(2)
        .line_format(LineFormat::NONE)
        .build()
        .unwrap();

    for i in 0..6 {
        logger.info(format!("entry {i}"));
        // One archive task at a time keeps pruning deterministic.
        logger.wait_compressions();
    }

    let kept = archives(dir.path(), ".gzip");
    assert_eq!(kept.len(), 2);
    let mut contents: Vec<String> = kept.iter().map(|path| gunzip(path).0).collect();
    contents.sort();
    assert_eq!(contents, ["[Info]  entry 3\n", "[Info]  entry 4\n"]);
}

#[test]
fn shutdown_settles_pending_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LoggerBuilder::new(&path)
        .max_size(RotationSize::Bytes(1))
        .compression(Compression::Gzip)
        .line_format(LineFormat::NONE)
        .build()
        .unwrap();
    logger.info("first");
    logger.info("second");

    for result in logger.shutdown(Shutdown::Cancel) {
        match result {
            Ok(compressed) => assert!(compressed.exists()),
            Err(LogError::CompressionCancelled(archive)) => assert!(archive.exists()),
            Err(err) => panic!("unexpected error: {err}"),
        }
    }
    assert_eq!(logger.pending_compressions(), 0);
    assert!(archives(dir.path(), ".tmp").is_empty());
}

#[test]
fn outcomes_of_finished_tasks_are_kept_until_collected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LoggerBuilder::new(&path)
        .max_size(RotationSize::Bytes(1))
        .compression(Compression::Gzip)
        .line_format(LineFormat::NONE)
        .build()
        .unwrap();

    for i in 0..4 {
        logger.info(format!("entry {i}"));
        // Let each task finish before the next rotation schedules another.
        while logger.pending_compressions() > 0 {
            thread::sleep(Duration::from_millis(5));
        }
    }

    let results = logger.wait_compressions();
    assert_eq!(results.len(), 3);
    let mut compressed: Vec<PathBuf> = results.into_iter().map(Result::unwrap).collect();
    compressed.sort();
    assert_eq!(archives(dir.path(), ".gzip"), compressed);
    assert!(logger.wait_compressions().is_empty());
}

#[test]
fn abandoning_returns_without_waiting() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = LoggerBuilder::new(&path)
        .max_size(RotationSize::Bytes(1))
        .compression(Compression::Gzip)
        .line_format(LineFormat::NONE)
        .build()
        .unwrap();
    logger.info("first");
    logger.info("second");
    while logger.pending_compressions() > 0 {
        thread::sleep(Duration::from_millis(5));
    }
    logger.info("third");

    let results = logger.shutdown(Shutdown::Abandon);
    assert!(!results.is_empty() && results.len() <= 2);
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(logger.pending_compressions(), 0);
    assert!(logger.wait_compressions().is_empty());
}
