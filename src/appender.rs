//! Lets a [`Logger`] act as the writer of a `tracing_subscriber::fmt`
//! subscriber. Formatted events bypass the logger's own line layout but go
//! through the same archive check as every other write.
use {crate::Logger, tracing_subscriber::fmt::MakeWriter};

impl<'a> MakeWriter<'a> for Logger {
    type Writer = &'a Logger;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}
