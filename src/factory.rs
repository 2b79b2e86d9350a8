use crate::{
    writers::{ConsoleWriter, FanOutWriter, RotatingFileWriter, SinkWriter},
    JsonEncoder, Options, Sink, DEFAULT_DRIVER, DEFAULT_FILE_STEM, LOG_SUFFIX,
};
use std::{path::PathBuf, sync::Arc};

/// The console stream to which records are duplicated in [`Mode::Dev`](crate::Mode::Dev).
#[derive(Clone, Default)]
pub enum ConsoleTarget {
    /// Write to stdout.
    #[default]
    Stdout,
    /// Write to stderr.
    Stderr,
    /// Write to a custom writer, e.g. a [`BufferWriter`](crate::writers::BufferWriter)
    /// for capturing the console output.
    Writer(Arc<dyn SinkWriter>),
}
impl std::fmt::Debug for ConsoleTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Self::Stdout => f.write_str("Stdout"),
            Self::Stderr => f.write_str("Stderr"),
            Self::Writer(_) => f.write_str("Writer(<..>)"),
        }
    }
}

/// Builds the [`Sink`]s of the drivers from the configured [`Options`].
///
/// Each sink gets its own [`RotatingFileWriter`] at `{log_path}/{name}.log`,
/// parameterized with the rotation limits of the options,
/// and the [`JsonEncoder`] with its fixed field mapping.
/// In [`Mode::Dev`](crate::Mode::Dev), the records are also written to the console.
///
/// Building a sink never fails, because the log file is only opened with the first record.
#[derive(Clone, Debug)]
pub struct SinkFactory {
    options: Arc<Options>,
    console: ConsoleTarget,
}
impl SinkFactory {
    /// Creates a factory for the given options.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            options: Arc::new(options),
            console: ConsoleTarget::default(),
        }
    }

    /// Chooses the console stream for [`Mode::Dev`](crate::Mode::Dev); the default is stdout.
    #[must_use]
    pub fn console(mut self, console: ConsoleTarget) -> Self {
        self.console = console;
        self
    }

    /// The options this factory builds from.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The path of the log file with the given file stem.
    #[must_use]
    pub fn resolve_path(&self, stem: &str) -> PathBuf {
        self.options
            .directory()
            .join(format!("{stem}.{LOG_SUFFIX}"))
    }

    /// The file stem of the `"default"` driver: the one from [`Options::file_name`], or `app`.
    #[must_use]
    pub fn default_stem(&self) -> &str {
        self.options.get_file_name().unwrap_or(DEFAULT_FILE_STEM)
    }

    /// Builds the sink for the driver with the given name.
    #[must_use]
    pub fn build(&self, name: &str) -> Sink {
        self.assemble(name, self.resolve_path(name))
    }

    /// Builds the sink for the `"default"` driver,
    /// which writes to the file stem from [`Options::file_name`], or to `app.log`.
    #[must_use]
    pub fn build_default(&self) -> Sink {
        self.assemble(DEFAULT_DRIVER, self.resolve_path(self.default_stem()))
    }

    fn assemble(&self, name: &str, path: PathBuf) -> Sink {
        let file_writer = RotatingFileWriter::builder(path.clone())
            .max_size(self.options.max_size_in_bytes().unwrap_or(0))
            .max_age(self.options.max_age_in_days().unwrap_or(0))
            .max_backups(self.options.max_backups_count().unwrap_or(0))
            .buffered(self.options.buffered)
            .local_time(self.options.local_time)
            .build();

        let writer: Box<dyn SinkWriter> = if self.options.is_dev() {
            Box::new(FanOutWriter::new(vec![
                Box::new(file_writer),
                self.console_writer(),
            ]))
        } else {
            Box::new(file_writer)
        };

        Sink::new(name, path, JsonEncoder::default(), writer)
    }

    fn console_writer(&self) -> Box<dyn SinkWriter> {
        match self.console {
            ConsoleTarget::Stdout => Box::new(ConsoleWriter::stdout()),
            ConsoleTarget::Stderr => Box::new(ConsoleWriter::stderr()),
            ConsoleTarget::Writer(ref w) => Box::new(Arc::clone(w)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ConsoleTarget, SinkFactory};
    use crate::{writers::BufferWriter, Mode, Options};
    use std::{path::PathBuf, sync::Arc};

    #[test]
    fn test_paths() {
        let factory = SinkFactory::new(Options::default().log_path("/tmp/x/"));
        assert_eq!(factory.build("worker").path(), PathBuf::from("/tmp/x/worker.log"));
        assert_eq!(factory.build_default().path(), PathBuf::from("/tmp/x/app.log"));
        assert_eq!(factory.build_default().name(), "default");

        let factory = SinkFactory::new(Options::default().log_path("/tmp/x").file_name("server"));
        assert_eq!(factory.build_default().path(), PathBuf::from("/tmp/x/server.log"));
        assert_eq!(factory.build("server").name(), "server");
        assert_eq!(factory.default_stem(), "server");
        assert_eq!(SinkFactory::new(Options::default()).default_stem(), "app");
    }

    #[test]
    fn test_build_does_not_touch_the_file_system() {
        let dir = temp_dir::TempDir::new().unwrap();
        let factory = SinkFactory::new(Options::default().log_path(dir.path().to_string_lossy()));
        let sink = factory.build("untouched");
        assert!(!sink.path().exists());
    }

    #[test]
    fn test_dev_mode_duplicates_to_console() {
        let dir = temp_dir::TempDir::new().unwrap();
        let console = BufferWriter::new();
        let factory = SinkFactory::new(
            Options::default()
                .mode(Mode::Dev)
                .log_path(dir.path().to_string_lossy()),
        )
        .console(ConsoleTarget::Writer(Arc::new(console.clone())));

        let sink = factory.build("dev");
        sink.info("twice", &[]);

        let in_file = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(console.contents(), in_file);
        assert!(in_file.contains("\"msg\":\"twice\""));
    }

    #[test]
    fn test_prod_mode_does_not_write_to_console() {
        let dir = temp_dir::TempDir::new().unwrap();
        let console = BufferWriter::new();
        let factory = SinkFactory::new(
            Options::default()
                .mode("prod")
                .log_path(dir.path().to_string_lossy()),
        )
        .console(ConsoleTarget::Writer(Arc::new(console.clone())));

        factory.build("prod").info("once", &[]);
        assert!(console.contents().is_empty());
    }
}
