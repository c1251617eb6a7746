use {
    rotalog::{Compression, LineFormat, LoggerBuilder, RotationSize, Shutdown},
    std::{sync::Arc, thread, time::Instant},
};

/// Many writers, a tiny threshold and gzip on every archive: checks that no
/// line goes missing while archives are compressed in the background.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let logger = Arc::new(
        LoggerBuilder::new("./logs/rapid/sized.log")
            .max_size(RotationSize::KB(1))
            .line_format(LineFormat::NONE)
            .compression(Compression::Gzip)
            .max_keep_files(5) // Keep only last 5 archives
            .build()?,
    );

    let writers: Vec<_> = (0..4)
        .map(|writer| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 1..=2_500 {
                    rotalog::info!(
                        logger => "Writer {writer} entry #{i}: This is a sample log message that will contribute to file size"
                    );
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().map_err(|_| "writer panicked")?;
    }

    let failed = logger
        .shutdown(Shutdown::Wait)
        .into_iter()
        .filter(Result::is_err)
        .count();
    println!("Done logging: {:?}, failed archive tasks: {failed}", start.elapsed());
    Ok(())
}
