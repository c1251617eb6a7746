use {
    rotalog::{Compression, LoggerBuilder, TimeZone},
    std::{thread, time::Duration},
};

/// Day rotation only happens on the first write of a new day. A scheduler
/// that wants archives cut exactly at midnight calls `force_archive_now`.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = LoggerBuilder::new("./logs/daily.log")
        .time_zone(TimeZone::UTC) // Name archives in UTC
        .compression(Compression::Gzip)
        .max_keep_files(7) // Keep one week of logs
        .build()?;

    logger.info("System startup - archives are named in UTC");
    logger.info("Configuration loaded successfully");

    thread::sleep(Duration::from_millis(100));
    if let Some(archive) = logger.force_archive_now()? {
        println!("Archived to {}", archive.display());
    }
    logger.info("Server listening on port 8080");

    for result in logger.wait_compressions() {
        match result {
            Ok(compressed) => println!("Compressed {}", compressed.display()),
            Err(err) => eprintln!("Compression failed: {err}"),
        }
    }
    Ok(())
}
