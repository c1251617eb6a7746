use {
    rotalog::{LoggerBuilder, RotationSize},
    tracing_subscriber::util::SubscriberInitExt,
};

/// With the `tracing` feature a Logger is a MakeWriter of its own: events are
/// written synchronously on the calling thread.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = LoggerBuilder::new("./logs/tracing_writer.log")
        .max_size(RotationSize::MB(10))
        .build()?;
    tracing_subscriber::fmt()
        .with_writer(logger)
        .with_ansi(false)
        .finish()
        .try_init()?;

    tracing::info!("written through the rotation check");
    Ok(())
}
