use crate::DriverError;
use serde_derive::Deserialize;
use std::path::{Path, PathBuf};

/// Mode of operation; decides whether log records are also written to the console.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(from = "String")]
pub enum Mode {
    /// Every record is written to its log file and duplicated to the console.
    Dev,
    /// Records are only written to the log files.
    #[default]
    Prod,
}
impl Mode {
    /// Only the exact string `"dev"` selects [`Mode::Dev`], everything else is [`Mode::Prod`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name == "dev" {
            Self::Dev
        } else {
            Self::Prod
        }
    }
}
impl From<String> for Mode {
    fn from(s: String) -> Self {
        Self::from_name(&s)
    }
}
impl From<&str> for Mode {
    fn from(s: &str) -> Self {
        Self::from_name(s)
    }
}

/// The resolved configuration of a [`Logger`](crate::Logger).
///
/// All fields are optional; missing values default to the empty string or zero.
///
/// The rotation limits are handed over to the
/// [`RotatingFileWriter`](crate::writers::RotatingFileWriter) as they are;
/// values of zero (or below) let the writer fall back to its own defaults:
/// 100 MB per file, no age limit, no limit for the number of rotated files.
///
/// `Options` can be deserialized with `serde`, using the keys
/// `mode`, `log_path`, `file_name`, `max_size`, `max_age`, `max_backups`,
/// `buffered`, and `local_time`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct Options {
    pub(crate) mode: Mode,
    pub(crate) log_path: String,
    pub(crate) file_name: String,
    pub(crate) max_size: i64,
    pub(crate) max_age: i64,
    pub(crate) max_backups: i64,
    pub(crate) buffered: bool,
    pub(crate) local_time: bool,
}

/// Simple methods for influencing the behavior of the `Logger`.
impl Options {
    /// Sets the mode; only `"dev"` duplicates the log records to stdout.
    #[must_use]
    pub fn mode<M: Into<Mode>>(mut self, mode: M) -> Self {
        self.mode = mode.into();
        self
    }

    /// Specifies the folder for the log files.
    ///
    /// The folder is created, if necessary, when the first record is written.
    /// By default, the log files are created in the folder where the program was started.
    #[must_use]
    pub fn log_path<S: Into<String>>(mut self, log_path: S) -> Self {
        self.log_path = log_path.into();
        self
    }

    /// The file stem of the default driver's log file, instead of `"app"`.
    #[must_use]
    pub fn file_name<S: Into<String>>(mut self, file_name: S) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// The size in megabytes that a log file may reach before it gets rotated.
    #[must_use]
    pub fn max_size(mut self, megabytes: i64) -> Self {
        self.max_size = megabytes;
        self
    }

    /// The number of days a rotated log file is kept.
    #[must_use]
    pub fn max_age(mut self, days: i64) -> Self {
        self.max_age = days;
        self
    }

    /// The number of rotated log files that are kept.
    #[must_use]
    pub fn max_backups(mut self, count: i64) -> Self {
        self.max_backups = count;
        self
    }

    /// Define if buffering should be used.
    ///
    /// By default, every log line is directly written to the output file, without buffering.
    /// With buffering, log lines become visible in the files only after
    /// [`Logger::sync`](crate::Logger::sync), or when the buffer is full.
    #[must_use]
    pub fn buffered(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    /// Makes the names of rotated files use the local time rather than UTC.
    #[must_use]
    pub fn local_time(mut self, local_time: bool) -> Self {
        self.local_time = local_time;
        self
    }
}

/// Accessors and parsers.
impl Options {
    /// Parses the options from a JSON document.
    ///
    /// # Errors
    ///
    /// `DriverError::Json` if the document is not valid.
    pub fn try_from_json(s: &str) -> Result<Self, DriverError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parses the options from a TOML document.
    ///
    /// # Errors
    ///
    /// `DriverError::Toml` if the document is not valid.
    #[cfg_attr(docsrs, doc(cfg(feature = "toml")))]
    #[cfg(feature = "toml")]
    pub fn try_from_toml(s: &str) -> Result<Self, DriverError> {
        Ok(toml::from_str(s)?)
    }

    /// The configured mode.
    #[must_use]
    pub fn get_mode(&self) -> Mode {
        self.mode
    }

    /// True if the log records are duplicated to the console.
    #[must_use]
    pub fn is_dev(&self) -> bool {
        self.mode == Mode::Dev
    }

    /// The configured file stem of the default driver, if any.
    #[must_use]
    pub fn get_file_name(&self) -> Option<&str> {
        if self.file_name.is_empty() {
            None
        } else {
            Some(&self.file_name)
        }
    }

    /// The log directory, with a single trailing path separator removed.
    ///
    /// An empty `log_path` denotes the current folder.
    #[must_use]
    pub fn directory(&self) -> PathBuf {
        let path = self
            .log_path
            .strip_suffix(std::path::is_separator)
            .unwrap_or(&self.log_path);
        if path.is_empty() && !self.log_path.is_empty() {
            // log_path is the root
            PathBuf::from(&self.log_path)
        } else if path.is_empty() {
            PathBuf::from(".")
        } else {
            Path::new(path).to_path_buf()
        }
    }

    /// The maximum size of a log file in bytes, if a positive size is configured.
    #[must_use]
    pub fn max_size_in_bytes(&self) -> Option<u64> {
        positive(self.max_size).map(|mb| mb.saturating_mul(1024 * 1024))
    }

    /// The maximum age of rotated files in days, if a positive age is configured.
    #[must_use]
    pub fn max_age_in_days(&self) -> Option<u64> {
        positive(self.max_age)
    }

    /// The maximum number of rotated files, if a positive number is configured.
    #[must_use]
    pub fn max_backups_count(&self) -> Option<usize> {
        positive(self.max_backups).and_then(|c| usize::try_from(c).ok())
    }
}

fn positive(v: i64) -> Option<u64> {
    u64::try_from(v).ok().filter(|v| *v > 0)
}
