use super::SinkWriter;
use std::io::{Stderr, Stdout, Write};

// Abstraction over stdout and stderr
#[derive(Debug)]
enum StdStream {
    Out(Stdout),
    Err(Stderr),
}

/// Writes the log records to stdout or stderr.
#[derive(Debug)]
pub struct ConsoleWriter(StdStream);
impl ConsoleWriter {
    /// Writes to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self(StdStream::Out(std::io::stdout()))
    }

    /// Writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self(StdStream::Err(std::io::stderr()))
    }
}
impl SinkWriter for ConsoleWriter {
    fn write(&self, record: &[u8]) -> std::io::Result<()> {
        // the lock keeps concurrent records from interleaving
        match self.0 {
            StdStream::Out(ref s) => s.lock().write_all(record),
            StdStream::Err(ref s) => s.lock().write_all(record),
        }
    }

    fn flush(&self) -> std::io::Result<()> {
        match self.0 {
            StdStream::Out(ref s) => s.lock().flush(),
            StdStream::Err(ref s) => s.lock().flush(),
        }
    }
}
