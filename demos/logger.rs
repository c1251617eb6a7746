use rotalog::{LoggerBuilder, RotationSize};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = LoggerBuilder::new("./logs/logger.log")
        .max_size(RotationSize::KB(256))
        .mirror_stdout(true)
        .build()?;

    logger.info("This is an info message");
    rotalog::info!(logger => "Hello {}", "World!");
    logger.error("This is an error message");

    Ok(())
}
