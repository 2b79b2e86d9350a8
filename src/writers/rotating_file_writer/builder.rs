use super::{Config, RotatingFileWriter, DEFAULT_MAX_SIZE};
use std::path::PathBuf;

/// Builder for [`RotatingFileWriter`].
///
/// Limits of zero are treated as "not set", so that the values of a configuration
/// can be passed through unchanged.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct RotatingFileWriterBuilder {
    config: Config,
    cleanup_in_background_thread: bool,
}

/// Simple methods for influencing the behavior of the `RotatingFileWriter`.
impl RotatingFileWriterBuilder {
    pub(super) fn new(path: PathBuf) -> Self {
        Self {
            config: Config {
                path,
                max_size: DEFAULT_MAX_SIZE,
                o_max_age_days: None,
                o_max_backups: None,
                buffered: false,
                local_time: false,
            },
            cleanup_in_background_thread: true,
        }
    }

    /// The size in bytes that the log file may reach before it is rotated.
    ///
    /// With zero, the default of 100 MB is used.
    #[must_use]
    pub fn max_size(mut self, bytes: u64) -> Self {
        self.config.max_size = if bytes == 0 { DEFAULT_MAX_SIZE } else { bytes };
        self
    }

    /// Rotated files are removed once their timestamp is older than the given number of days.
    ///
    /// With zero, rotated files are not removed because of their age.
    #[must_use]
    pub fn max_age(mut self, days: u64) -> Self {
        self.config.o_max_age_days = if days == 0 { None } else { Some(days) };
        self
    }

    /// Only the given number of rotated files is kept, older ones are removed.
    ///
    /// With zero, all rotated files are kept (unless they are too old).
    #[must_use]
    pub fn max_backups(mut self, count: usize) -> Self {
        self.config.o_max_backups = if count == 0 { None } else { Some(count) };
        self
    }

    /// Define if buffering should be used.
    ///
    /// By default, every log line is directly written to the output file, without buffering.
    /// This allows seeing new log lines in real time.
    ///
    /// With buffering, you should call [`SinkWriter::flush`](crate::writers::SinkWriter::flush)
    /// before the program terminates.
    #[must_use]
    pub fn buffered(mut self, buffered: bool) -> Self {
        self.config.buffered = buffered;
        self
    }

    /// Use the local time rather than UTC for the timestamps in the names of rotated files.
    #[must_use]
    pub fn local_time(mut self, local_time: bool) -> Self {
        self.config.local_time = local_time;
        self
    }

    /// Defines if the removal of too many or too old rotated files is done
    /// in a background thread (default), or in the thread that causes the rotation.
    #[must_use]
    pub fn cleanup_in_background_thread(mut self, use_background_thread: bool) -> Self {
        self.cleanup_in_background_thread = use_background_thread;
        self
    }

    /// Produces the `RotatingFileWriter`.
    ///
    /// This does not touch the file system; the log file is opened with the first write.
    #[must_use]
    pub fn build(self) -> RotatingFileWriter {
        RotatingFileWriter::new(self.config, self.cleanup_in_background_thread)
    }
}
