use crate::{
    util::{eprint_err, ErrorCode},
    DriverError, DriverRegistry, Options, Sink, SinkFactory, DEFAULT_DRIVER,
};
use std::sync::Arc;

/// The entry point for using `log_drivers`.
///
/// A `Logger` owns a [`DriverRegistry`] and hands out its named drivers.
/// Each driver is a [`Sink`] that writes JSON lines to its own rotating log file.
///
/// Create a `Logger` with your [`Options`],
/// then obtain the driver you need with [`Logger::default`] or [`Logger::store`],
/// and call [`Logger::sync`] (or use [`Logger::sync_on_drop`]) before the program ends.
///
/// ## Examples
///
/// ### Use the default driver
///
/// ```rust
/// use log_drivers::{Logger, Options};
///
/// let logger = Logger::new(Options::default().log_path("log_files/logger_docu"));
/// logger.default().info("service started", &[]);
/// logger.sync();
/// ```
///
/// This writes to `log_files/logger_docu/app.log`.
///
/// ### Use one driver per component
///
/// ```rust
/// use log_drivers::{Field, Logger, Options};
///
/// let logger = Logger::new(
///     Options::default()
///         .log_path("log_files/logger_docu")
///         .max_size(10)
///         .max_backups(3),
/// );
/// let _guard = logger.sync_on_drop();
///
/// let orders = logger.store("orders");
/// orders.info("order accepted", &[Field::uint("id", 4711)]);
/// ```
///
/// Records of the `"orders"` driver go to `log_files/logger_docu/orders.log`;
/// the file is rotated when it would grow beyond 10 MB, and at most 3 rotated files are kept.
///
/// ### Route the `log` macros
///
/// With [`Logger::start`], the `log` macros are routed to the drivers:
/// a target of the form `"{orders}"` selects the driver `"orders"`,
/// all other records go to the default driver.
///
/// ```rust,ignore
/// logger.start()?;
/// log::info!(target: "{orders}", "order accepted");
/// log::info!("this goes to the default driver");
/// ```
#[derive(Clone, Debug)]
pub struct Logger {
    registry: Arc<DriverRegistry>,
}
impl Logger {
    /// Creates a ready-to-use `Logger`, including its default driver.
    ///
    /// No file is opened before the first record is written.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self::with_factory(SinkFactory::new(options))
    }

    /// Creates a ready-to-use `Logger` that uses the given factory.
    ///
    /// Allows e.g. choosing the console stream for [`Mode::Dev`](crate::Mode::Dev).
    #[must_use]
    pub fn with_factory(factory: SinkFactory) -> Self {
        Self {
            registry: Arc::new(DriverRegistry::new(factory)),
        }
    }

    /// The default driver.
    ///
    /// # Panics
    ///
    /// If the default driver is missing from the registry, which cannot happen
    /// with a correctly constructed `Logger`.
    #[must_use]
    pub fn default(&self) -> Arc<Sink> {
        match self.registry.get(DEFAULT_DRIVER) {
            Ok(sink) => sink,
            Err(e) => panic!("{e}"),
        }
    }

    /// The driver with the given name; it is created if it doesn't exist yet.
    ///
    /// The empty name denotes the default driver, and so does the file stem
    /// of the default driver's log file.
    #[must_use]
    pub fn store(&self, name: &str) -> Arc<Sink> {
        if name.is_empty() {
            self.default()
        } else {
            self.registry.get_or_create(name)
        }
    }

    /// Flushes all drivers.
    ///
    /// Failures are reported on stderr, and do not keep other drivers from being flushed.
    pub fn sync(&self) {
        for (name, e) in self.registry.sync_all() {
            eprint_err(
                ErrorCode::Flush,
                &format!("flushing driver \"{name}\" failed"),
                &e,
            );
        }
    }

    /// Flushes all drivers, and returns the failures.
    ///
    /// # Errors
    ///
    /// `DriverError::Flush` with the names and errors of all drivers that could not be flushed.
    pub fn try_sync(&self) -> Result<(), DriverError> {
        let failures = self.registry.sync_all();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DriverError::Flush(failures))
        }
    }

    /// Returns a guard that calls [`Logger::sync`] when it is dropped.
    ///
    /// Keep the guard alive in your `main` function to ensure that all records are written
    /// when the program ends.
    #[must_use]
    pub fn sync_on_drop(&self) -> SyncGuard {
        SyncGuard {
            logger: self.clone(),
        }
    }

    /// The registry with all drivers.
    #[must_use]
    pub fn registry(&self) -> &DriverRegistry {
        &self.registry
    }

    /// Registers this `Logger` as the global logger of the `log` facade.
    ///
    /// Records with a target of the form `"{name}"` are written by the driver `name`,
    /// with `"{name1,name2}"` by each of the named drivers.
    /// All other records are written by the default driver.
    ///
    /// # Errors
    ///
    /// `DriverError::Log` if a global logger was already set.
    pub fn start(&self) -> Result<(), DriverError> {
        log::set_boxed_logger(Box::new(Dispatcher {
            logger: self.clone(),
        }))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}

/// Flushes all drivers of a [`Logger`] when it is dropped.
///
/// Created with [`Logger::sync_on_drop`].
#[derive(Debug)]
pub struct SyncGuard {
    logger: Logger,
}
impl Drop for SyncGuard {
    fn drop(&mut self) {
        self.logger.sync();
    }
}

// The global logger of the log facade.
struct Dispatcher {
    logger: Logger,
}

// "{a,b}" names the drivers a and b; other targets name none
fn driver_names(target: &str) -> Option<impl Iterator<Item = &str>> {
    target
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .map(|names| names.split(',').map(str::trim))
}

impl log::Log for Dispatcher {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        match driver_names(record.target()) {
            Some(names) => {
                for name in names {
                    log::Log::log(&*self.logger.store(name), record);
                }
            }
            None => log::Log::log(&*self.logger.default(), record),
        }
    }

    fn flush(&self) {
        self.logger.sync();
    }
}

#[cfg(test)]
mod test {
    use super::{driver_names, Logger};
    use crate::{writers::SinkWriter, ConsoleTarget, DriverError, Mode, Options, SinkFactory};
    use std::sync::Arc;

    fn logger(dir: &temp_dir::TempDir) -> Logger {
        Logger::new(Options::default().log_path(dir.path().to_string_lossy()))
    }

    #[test]
    fn test_store() {
        let dir = temp_dir::TempDir::new().unwrap();
        let logger = logger(&dir);
        assert!(Arc::ptr_eq(&logger.store(""), &logger.default()));
        assert!(Arc::ptr_eq(&logger.store("default"), &logger.default()));
        assert!(Arc::ptr_eq(&logger.store("w"), &logger.store("w")));
        assert!(!Arc::ptr_eq(&logger.store("w"), &logger.default()));
        assert!(Arc::ptr_eq(&logger.store("app"), &logger.default()));
    }

    #[test]
    fn test_clones_share_the_registry() {
        let dir = temp_dir::TempDir::new().unwrap();
        let logger = logger(&dir);
        let clone = logger.clone();
        let sink = clone.store("shared");
        drop(clone);
        assert!(Arc::ptr_eq(&sink, &logger.store("shared")));
    }

    #[test]
    fn test_try_sync() {
        let dir = temp_dir::TempDir::new().unwrap();
        let logger = logger(&dir);
        logger.default().info("a", &[]);
        logger.store("b").info("b", &[]);
        assert!(logger.try_sync().is_ok());

        // in dev mode, each driver also flushes the shared console writer
        let logger = Logger::with_factory(
            SinkFactory::new(
                Options::default()
                    .log_path(dir.path().to_string_lossy())
                    .mode(Mode::Dev),
            )
            .console(ConsoleTarget::Writer(Arc::new(UnflushableWriter))),
        );
        logger.store("b").info("b", &[]);
        match logger.try_sync() {
            Err(DriverError::Flush(failures)) => {
                let mut names: Vec<String> = failures.into_iter().map(|(name, _)| name).collect();
                names.sort();
                assert_eq!(names, vec!["b".to_string(), "default".to_string()]);
            }
            other => panic!("unexpected result {other:?}"),
        }
        // the records reached the file nevertheless
        assert!(std::fs::read_to_string(dir.path().join("b.log"))
            .unwrap()
            .contains("\"msg\":\"b\""));
    }

    struct UnflushableWriter;
    impl SinkWriter for UnflushableWriter {
        fn write(&self, _record: &[u8]) -> std::io::Result<()> {
            Ok(())
        }
        fn flush(&self) -> std::io::Result<()> {
            Err(std::io::Error::other("device gone"))
        }
    }

    #[test]
    fn test_sync_on_drop() {
        let dir = temp_dir::TempDir::new().unwrap();
        let logger = Logger::new(
            Options::default()
                .log_path(dir.path().to_string_lossy())
                .buffered(true),
        );
        let path = {
            let _guard = logger.sync_on_drop();
            let sink = logger.store("guarded");
            sink.info("kept", &[]);
            sink.path().to_path_buf()
        };
        assert!(std::fs::read_to_string(path).unwrap().contains("\"msg\":\"kept\""));
    }

    fn names(target: &str) -> Option<Vec<&str>> {
        driver_names(target).map(Iterator::collect)
    }

    #[test]
    fn test_targets() {
        assert_eq!(names("{orders}"), Some(vec!["orders"]));
        assert_eq!(names("{a, b}"), Some(vec!["a", "b"]));
        assert_eq!(names("{}"), Some(vec![""]));
        assert_eq!(names("my_crate::module"), None);
        assert_eq!(names("{unclosed"), None);
    }
}
