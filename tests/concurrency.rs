mod common;

use {
    common::{archives, hundred_byte_message},
    rotalog::{LineFormat, LoggerBuilder, RotationSize},
    std::{
        collections::HashSet,
        fs,
        sync::{Arc, Barrier},
        thread,
    },
};

#[test]
fn racing_writers_archive_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = Arc::new(
        LoggerBuilder::new(&path)
            .max_size(RotationSize::Bytes(1024))
            .line_format(LineFormat::NONE)
            .build()
            .unwrap(),
    );

    // 1100 bytes: every writer below sees the file as due.
    for i in 0..11 {
        logger.info(hundred_byte_message(i));
    }
    assert!(logger.should_rotate());

    let writers = 8;
    let barrier = Arc::new(Barrier::new(writers));
    let handles: Vec<_> = (0..writers)
        .map(|writer| {
            let logger = Arc::clone(&logger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                logger.info(format!("writer {writer}"));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let found = archives(dir.path(), ".log");
    assert_eq!(found.len(), 1, "{found:?}");

    let archived = fs::read_to_string(&found[0]).unwrap();
    let active = fs::read_to_string(&path).unwrap();
    for i in 0..11 {
        assert!(archived.contains(&hundred_byte_message(i)));
    }

    // Every writer's line landed exactly once, on one side of the boundary.
    let all: Vec<&str> = archived.lines().chain(active.lines()).collect();
    assert_eq!(all.len(), 11 + writers);
    let unique: HashSet<&str> = all.iter().copied().collect();
    assert_eq!(unique.len(), all.len());
    for writer in 0..writers {
        assert!(unique.contains(format!("[Info]  writer {writer}").as_str()));
    }
}

#[test]
fn many_writers_lose_no_lines_across_rotations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let logger = Arc::new(
        LoggerBuilder::new(&path)
            .max_size(RotationSize::KB(4))
            .line_format(LineFormat::NONE)
            .build()
            .unwrap(),
    );

    let writers = 4;
    let per_writer = 250;
    let handles: Vec<_> = (0..writers)
        .map(|writer| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..per_writer {
                    rotalog::info!(logger => "writer {writer} entry {i}");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut lines = HashSet::new();
    let mut files = archives(dir.path(), ".log");
    files.push(path);
    for file in files {
        for line in fs::read_to_string(&file).unwrap().lines() {
            assert!(lines.insert(line.to_string()), "duplicate line {line}");
        }
    }
    assert_eq!(lines.len(), writers * per_writer);
}
