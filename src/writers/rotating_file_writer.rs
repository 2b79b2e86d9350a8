mod builder;
mod config;
mod state;

pub use self::builder::RotatingFileWriterBuilder;

use self::config::Config;
use self::state::State;
use super::SinkWriter;
use crate::util::{eprint_msg, io_err, ErrorCode};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Size limit of a log file if none is configured: 100 MB.
pub const DEFAULT_MAX_SIZE: u64 = 100 * 1024 * 1024;

/// Layout of the timestamp in the names of rotated files,
/// e.g. `worker-2024-03-17T15-04-05.123.log`.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

/// A writer that writes log records to a file and rotates this file before it would grow
/// beyond its maximum size.
///
/// The log file is opened lazily, with the first record; if it exists already,
/// new records are appended. If the log directory does not exist, it is created.
///
/// On rotation, the current file is renamed by adding the current timestamp to its file stem,
/// e.g. `app.log` becomes `app-2024-03-17T15-04-05.123.log`,
/// and a fresh file is opened under the original name.
/// The timestamp is UTC, unless [`RotatingFileWriterBuilder::local_time`] was set.
///
/// After a rotation, rotated files are removed
///
/// * if more of them exist than [`RotatingFileWriterBuilder::max_backups`] allows
///   (the newest ones are kept),
/// * if their timestamp is older than [`RotatingFileWriterBuilder::max_age`] allows.
///
/// By default this cleanup happens in a background thread.
///
/// All methods can be called concurrently; the writes of one `RotatingFileWriter`
/// are serialized with a `Mutex`.
#[derive(Debug)]
pub struct RotatingFileWriter {
    path: PathBuf,
    state: Mutex<State>,
}
impl RotatingFileWriter {
    /// Instantiates a builder for a writer to the given file.
    pub fn builder<P: Into<PathBuf>>(path: P) -> RotatingFileWriterBuilder {
        RotatingFileWriterBuilder::new(path.into())
    }

    pub(super) fn new(config: Config, cleanup_in_background_thread: bool) -> Self {
        Self {
            path: config.path.clone(),
            state: Mutex::new(State::new(config, cleanup_in_background_thread)),
        }
    }

    /// The path of the file that is currently written to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The maximum size of a log file, in bytes.
    #[must_use]
    pub fn max_size(&self) -> u64 {
        self.lock_state().map_or(DEFAULT_MAX_SIZE, |state| state.config().max_size)
    }

    /// Returns the rotated files of this writer, newest first.
    ///
    /// The current log file is not contained.
    #[must_use]
    pub fn existing_backups(&self) -> Vec<PathBuf> {
        self.lock_state()
            .and_then(|state| state.existing_backups())
            .unwrap_or_default()
    }

    /// Flushes and closes the log file, and stops the cleanup thread, if any.
    ///
    /// Further writes would open the file again.
    pub fn shutdown(&self) {
        if let Ok(mut state) = self.lock_state() {
            state.shutdown();
        }
    }

    fn lock_state(&self) -> std::io::Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| {
            eprint_msg(ErrorCode::Poison, "rotating file writer is unusable");
            io_err("RotatingFileWriter is poisoned")
        })
    }
}

impl SinkWriter for RotatingFileWriter {
    fn write(&self, record: &[u8]) -> std::io::Result<()> {
        self.lock_state()?.write_buffer(record)
    }

    fn flush(&self) -> std::io::Result<()> {
        self.lock_state()?.flush()
    }

    /// Renames the current log file to a backup and continues with a fresh file.
    fn rotate(&self) -> std::io::Result<()> {
        self.lock_state()?.rotate()
    }
}

impl Drop for RotatingFileWriter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
