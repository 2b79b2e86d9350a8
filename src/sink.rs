use crate::{
    util::{buffer_with, eprint_err, ErrorCode},
    writers::SinkWriter,
    DeferredNow, Field, FieldValue, JsonEncoder,
};
use log::{
    kv::{Key, Source, Value, VisitSource},
    Level, Record,
};
use std::path::{Path, PathBuf};

/// The logging capability of a single driver.
///
/// A `Sink` combines a [`JsonEncoder`] with one or more output streams,
/// and accepts log calls of all levels; there is no level filtering.
///
/// Failures of the output are not returned to the caller,
/// but reported on stderr (see [`error_info`](crate::error_info)).
///
/// ```rust
/// # use log_drivers::{Field, Logger, Options};
/// # let logger = Logger::new(Options::default().log_path("log_files/sink_docu"));
/// let sink = logger.default();
/// sink.info("Hello", &[]);
/// sink.debug("this is debug", &[Field::time("loadTime", chrono::Local::now())]);
/// ```
///
/// `Sink` also implements [`log::Log`], so it can consume the records of the `log` macros,
/// including their key-value pairs.
pub struct Sink {
    name: String,
    path: PathBuf,
    encoder: JsonEncoder,
    writer: Box<dyn SinkWriter>,
}
impl Sink {
    /// Assembles a sink; usually done by the [`SinkFactory`](crate::SinkFactory).
    #[must_use]
    pub fn new<S: Into<String>>(
        name: S,
        path: PathBuf,
        encoder: JsonEncoder,
        writer: Box<dyn SinkWriter>,
    ) -> Self {
        Self {
            name: name.into(),
            path,
            encoder,
            writer,
        }
    }

    /// The name of the driver.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The path of the driver's log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes a record with the given level, message, and structured fields.
    ///
    /// The caller's source location is added to the record.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, fields: &[Field]) {
        let caller = std::panic::Location::caller();
        self.write_entry(level, Some((caller.file(), caller.line())), msg, fields);
    }

    /// Writes a record with level `TRACE`.
    #[track_caller]
    pub fn trace(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Trace, msg, fields);
    }

    /// Writes a record with level `DEBUG`.
    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Debug, msg, fields);
    }

    /// Writes a record with level `INFO`.
    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Info, msg, fields);
    }

    /// Writes a record with level `WARN`.
    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Warn, msg, fields);
    }

    /// Writes a record with level `ERROR`.
    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Error, msg, fields);
    }

    /// Flushes all buffered records to the output streams.
    ///
    /// # Errors
    ///
    /// Any I/O error of the output streams.
    pub fn sync(&self) -> std::io::Result<()> {
        self.writer.flush()
    }

    /// Rotates the driver's log file immediately.
    ///
    /// # Errors
    ///
    /// Any I/O error while renaming or opening the log file.
    pub fn rotate(&self) -> std::io::Result<()> {
        self.writer.rotate()
    }

    fn write_entry(&self, level: Level, o_caller: Option<(&str, u32)>, msg: &str, fields: &[Field]) {
        let mut now = DeferredNow::new();
        buffer_with(|tl_buf| match tl_buf.try_borrow_mut() {
            Ok(mut buffer) => {
                self.encode_and_write(&mut buffer, &mut now, level, o_caller, msg, fields);
                buffer.clear();
            }
            Err(_e) => {
                // We arrive here in the rare cases of recursive logging
                // (e.g. log calls in Debug or Display implementations)
                let mut tmp_buf = Vec::<u8>::with_capacity(200);
                self.encode_and_write(&mut tmp_buf, &mut now, level, o_caller, msg, fields);
            }
        });
    }

    fn encode_and_write(
        &self,
        buffer: &mut Vec<u8>,
        now: &mut DeferredNow,
        level: Level,
        o_caller: Option<(&str, u32)>,
        msg: &str,
        fields: &[Field],
    ) {
        if let Err(e) = self
            .encoder
            .encode(buffer, now, level, o_caller, msg, fields)
        {
            eprint_err(ErrorCode::Format, "formatting failed", &e);
            return;
        }
        if let Err(e) = self.writer.write(buffer) {
            eprint_err(
                ErrorCode::Write,
                &format!("writing log line to driver \"{}\" failed", self.name),
                &e,
            );
        }
    }
}

impl log::Log for Sink {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let msg = record.args().to_string();
        let fields = kv_fields(record);
        let o_caller = record.file().map(|file| (file, record.line().unwrap_or(0)));
        self.write_entry(record.level(), o_caller, &msg, &fields);
    }

    fn flush(&self) {
        self.sync().unwrap_or_else(|e| {
            eprint_err(
                ErrorCode::Flush,
                &format!("flushing driver \"{}\" failed", self.name),
                &e,
            );
        });
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.debug_struct("Sink")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("encoder", &self.encoder)
            .field("writer", &"<..>")
            .finish()
    }
}

// Converts the key-value pairs of a log record into fields, in their order
fn kv_fields(record: &Record) -> Vec<Field> {
    struct Collector(Vec<Field>);
    impl<'kvs> VisitSource<'kvs> for Collector {
        fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), log::kv::Error> {
            let json = serde_json::to_value(&value)
                .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
            self.0
                .push(Field::new(key.as_str().to_string(), FieldValue::Json(json)));
            Ok(())
        }
    }

    let mut collector = Collector(Vec::new());
    record.key_values().visit(&mut collector).ok();
    collector.0
}
