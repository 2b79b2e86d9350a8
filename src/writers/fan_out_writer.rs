use super::SinkWriter;
use std::io;

/// Duplicates every record to all of its writers.
///
/// A failing writer does not keep the record from reaching the other writers;
/// the first error is returned after all writers were served.
pub struct FanOutWriter {
    writers: Vec<Box<dyn SinkWriter>>,
}
impl FanOutWriter {
    /// Creates a writer that duplicates to the given writers, in the given order.
    #[must_use]
    pub fn new(writers: Vec<Box<dyn SinkWriter>>) -> Self {
        Self { writers }
    }

    fn for_all<F>(&self, f: F) -> io::Result<()>
    where
        F: Fn(&dyn SinkWriter) -> io::Result<()>,
    {
        let mut result = Ok(());
        for writer in &self.writers {
            if let Err(e) = f(writer.as_ref()) {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}
impl SinkWriter for FanOutWriter {
    fn write(&self, record: &[u8]) -> io::Result<()> {
        self.for_all(|w| w.write(record))
    }

    fn flush(&self) -> io::Result<()> {
        self.for_all(|w| w.flush())
    }

    fn rotate(&self) -> io::Result<()> {
        self.for_all(|w| w.rotate())
    }
}
impl std::fmt::Debug for FanOutWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.debug_struct("FanOutWriter")
            .field("writers", &self.writers.len())
            .finish()
    }
}
