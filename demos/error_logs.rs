use rotalog::{Compression, LineFormat, LoggerBuilder, RotationSize};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Error logger with call sites in every line and compressed archives
    let error_logger = LoggerBuilder::new("./logs/errors/app.log")
        .max_size(RotationSize::KB(64))
        .line_format(LineFormat::DETAILED)
        .compression(Compression::Gzip)
        .max_keep_files(24)
        .build()?;

    // Simulate some error logging
    for error_code in &[500, 502, 503, 504] {
        rotalog::error!(
            error_logger => "Error {error_code}: Server encountered an internal error, please try again later"
        );
        rotalog::error!(error_logger => "Stack trace for error {error_code}:");
        error_logger.error("  at processRequest (server.rs:42)");
        error_logger.error("  at handleConnection (network.rs:121)");
        error_logger.error("  at main (main.rs:15)");
        error_logger.error("--------------------");
    }

    error_logger.wait_compressions();
    Ok(())
}
