use {
    rotalog::{Compression, LineFormat, LogError, Logger, LoggerBuilder, RotationSize},
    std::time::Instant,
};

const LOG_FOLDER: &str = "./logs/compression";

/// Very dependant on log pattern, On random pattern data might not be worth using compression
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let logger = LoggerBuilder::new(format!("{LOG_FOLDER}/gzip/app.log"))
        .max_size(RotationSize::MB(1))
        .line_format(LineFormat::NONE)
        .compression(Compression::Gzip)
        .build()?;
    writing_log(&logger)?;

    #[cfg(feature = "xz")]
    {
        let logger = LoggerBuilder::new(format!("{LOG_FOLDER}/xz/app.log"))
            .max_size(RotationSize::MB(1))
            .line_format(LineFormat::NONE)
            .compression(Compression::XZ)
            .build()?;
        writing_log(&logger)?;
    }

    #[cfg(not(feature = "xz"))]
    {
        println!("XZ compression examples skipped. Enable 'xz' feature to run XZ compression tests.");
    }
    println!("Done Compressing: {:?}", start.elapsed());
    println!("File | Compression percentage | Bytes");
    for folder in ["gzip", "xz"] {
        let Ok(entries) = std::fs::read_dir(format!("{LOG_FOLDER}/{folder}")) else {
            continue;
        };
        for entry in entries.flatten() {
            let size = get_file_size(&entry.path());
            println!(
                "{:?} : {:.2}% : {:?} Bytes",
                entry.file_name(),
                size as f64 * 100.0 / (1024.0 * 1024.0),
                size
            );
        }
    }

    Ok(())
}

fn get_file_size(log_path: &std::path::Path) -> u64 {
    std::fs::metadata(log_path).map_or(0, |m| m.len())
}

/// This is log example, Compression rate will differ with log patterns.
fn writing_log(logger: &Logger) -> Result<(), LogError> {
    for i in 1..=35_000 {
        rotalog::info!(logger => "Log entry #{i}: This is a sample log message that will contribute to file size");
    }
    logger.force_archive_now()?;
    for result in logger.wait_compressions() {
        result?;
    }
    Ok(())
}
