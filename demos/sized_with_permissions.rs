use rotalog::{LoggerBuilder, RotationSize};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = LoggerBuilder::new("./logs/sized.log")
        .max_size(RotationSize::MB(1)) // Archive at 1MB
        .max_keep_files(5) // Keep only last 5 archives
        .file_mode(0o640) // Set file permissions to: owner rw, group r, others none
        .build()?;

    // Simulate writing logs that will trigger size-based rotation
    for i in 1..=20_000 {
        rotalog::info!(
            logger => "Log entry #{}: This is a sample log message that will contribute to file size",
            i
        );
    }

    logger.wait_compressions();
    Ok(())
}
