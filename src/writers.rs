//! Contains the trait [`SinkWriter`] for the output streams of a [`Sink`](crate::Sink),
//! and its implementations:
//!
//! * [`RotatingFileWriter`] writes to a log file that is rotated when it would grow beyond
//!   a maximum size; rotated files are removed when there are too many of them,
//!   or when they are too old,
//! * [`ConsoleWriter`] writes to stdout or stderr,
//! * [`FanOutWriter`] duplicates every record to several other writers,
//! * [`BufferWriter`] collects the output in memory.
//!
//! All drivers of a [`Logger`](crate::Logger) use a `RotatingFileWriter`;
//! in [`Mode::Dev`](crate::Mode::Dev), it is combined with a `ConsoleWriter`
//! into a `FanOutWriter`.
//!
//! A `RotatingFileWriter` can also be used on its own:
//!
//! ```rust
//! use log_drivers::writers::{RotatingFileWriter, SinkWriter};
//!
//! let writer = RotatingFileWriter::builder("log_files/writers_docu/audit.log")
//!     .max_size(1024 * 1024)
//!     .max_backups(3)
//!     .build();
//! writer.write(b"{\"msg\":\"audit record\"}\n").unwrap();
//! writer.flush().unwrap();
//! ```

mod buffer_writer;
mod console_writer;
mod fan_out_writer;
mod rotating_file_writer;

pub use self::buffer_writer::BufferWriter;
pub use self::console_writer::ConsoleWriter;
pub use self::fan_out_writer::FanOutWriter;
pub use self::rotating_file_writer::{
    RotatingFileWriter, RotatingFileWriterBuilder, BACKUP_TIMESTAMP_FORMAT, DEFAULT_MAX_SIZE,
};

use std::io;

/// Writes serialized log records to a single output stream.
///
/// Implementations must be usable from many threads at the same time,
/// and must write each record atomically, i.e. records of concurrent calls
/// must not be interleaved.
pub trait SinkWriter: Sync + Send {
    /// Writes out one serialized record, including its line ending.
    ///
    /// # Errors
    ///
    /// Any I/O error of the underlying output.
    fn write(&self, record: &[u8]) -> io::Result<()>;

    /// Flushes any buffered records.
    ///
    /// # Errors
    ///
    /// Any I/O error of the underlying output.
    fn flush(&self) -> io::Result<()>;

    /// Closes the current output and continues with a fresh one, if the writer supports that.
    ///
    /// The default implementation does nothing.
    ///
    /// # Errors
    ///
    /// Any I/O error of the underlying output.
    fn rotate(&self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: SinkWriter + ?Sized> SinkWriter for std::sync::Arc<W> {
    fn write(&self, record: &[u8]) -> io::Result<()> {
        (**self).write(record)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }

    fn rotate(&self) -> io::Result<()> {
        (**self).rotate()
    }
}
