use {
    rotalog::{Compression, LoggerBuilder, RotationSize},
    tracing_subscriber::util::SubscriberInitExt,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = LoggerBuilder::new("./logs/tracing.log")
        .max_size(RotationSize::MB(10))
        .compression(Compression::Gzip)
        .build()?;
    // A Logger is an io::Write sink, so it can sit behind tracing_appender's worker thread
    let (non_blocking, _guard) = tracing_appender::non_blocking(logger);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .finish()
        .try_init()?;

    tracing::info!("This is an info message");
    tracing::warn!("This is a warning message");
    tracing::error!("This is an error message");

    Ok(())
}
