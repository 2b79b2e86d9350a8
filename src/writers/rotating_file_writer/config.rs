use std::path::{Path, PathBuf};

// The immutable configuration of a RotatingFileWriter.
#[derive(Clone, Debug)]
pub(crate) struct Config {
    pub(crate) path: PathBuf,
    // in bytes
    pub(crate) max_size: u64,
    pub(crate) o_max_age_days: Option<u64>,
    pub(crate) o_max_backups: Option<usize>,
    pub(crate) buffered: bool,
    pub(crate) local_time: bool,
}
impl Config {
    pub(crate) fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    // e.g. "app" for "logs/app.log"
    pub(crate) fn file_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    // e.g. Some("log") for "logs/app.log"
    pub(crate) fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|s| s.to_string_lossy().to_string())
    }

    pub(crate) fn does_cleanup(&self) -> bool {
        self.o_max_age_days.is_some() || self.o_max_backups.is_some()
    }
}
