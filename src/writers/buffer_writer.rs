use super::SinkWriter;
use crate::util::io_err;
use std::sync::{Arc, Mutex};

/// Collects all log records in memory.
///
/// Clones share the same buffer, so that a clone can be handed over to a
/// [`SinkFactory`](crate::SinkFactory) while the original is used to inspect the output.
#[derive(Clone, Debug, Default)]
pub struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}
impl BufferWriter {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything that was written so far.
    #[must_use]
    pub fn contents(&self) -> String {
        self.buffer.lock().map_or_else(
            |poisoned| String::from_utf8_lossy(&poisoned.into_inner()).to_string(),
            |buffer| String::from_utf8_lossy(&buffer).to_string(),
        )
    }

    /// Returns the written records, one per line.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(ToString::to_string).collect()
    }
}
impl SinkWriter for BufferWriter {
    fn write(&self, record: &[u8]) -> std::io::Result<()> {
        self.buffer
            .lock()
            .map_err(|_| io_err("BufferWriter is poisoned"))?
            .extend_from_slice(record);
        Ok(())
    }

    fn flush(&self) -> std::io::Result<()> {
        Ok(())
    }
}
