// only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! A process-local logger that writes structured JSON log records
//! to several independently rotated log files, the "drivers".
//!
//! A [`Logger`] is created from resolved [`Options`].
//! It provides the `"default"` driver immediately,
//! and creates further drivers lazily, on their first request, by name:
//!
//! ```rust
//! use log_drivers::{Field, Logger, Options};
//!
//! let logger = Logger::new(
//!     Options::default()
//!         .log_path("log_files/lib_docu")
//!         .max_size(10)
//!         .max_backups(5),
//! );
//! // flush all drivers when this scope is left
//! let _guard = logger.sync_on_drop();
//!
//! logger.default().info("Hello", &[]);
//! logger
//!     .store("worker")
//!     .debug("job done", &[Field::duration("took", std::time::Duration::from_millis(1500))]);
//! ```
//!
//! Each driver writes to `{log_path}/{name}.log`; the default driver writes to
//! `{log_path}/app.log`, unless [`Options::file_name`] chooses a different file stem.
//!
//! Every log line is a JSON object with the keys `level`, `time`, `caller`, `msg`,
//! followed by the structured fields of the call.
//!
//! The log files are rotated as soon as they would grow beyond the configured size;
//! rotated files get a timestamp infix and are removed once there are
//! too many of them or once they are too old.
//!
//! In [`Mode::Dev`], every record is additionally written to stdout.
//!
//! See
//!
//! * [`Logger`] for the facade,
//! * [`DriverRegistry`] for the concurrency contract of the lazily populated driver map,
//! * [`SinkFactory`] for how a driver is assembled,
//! * the module [`writers`] for the rotating file writer and the other output streams,
//! * the module [`error_info`] for the error codes that are printed to stderr
//!   when writing or flushing fails.

mod deferred_now;
mod driver_error;
mod encoder;
mod factory;
mod fields;
mod logger;
mod options;
mod registry;
mod sink;
mod util;

pub mod error_info;
pub mod writers;

pub use crate::deferred_now::DeferredNow;
pub use crate::driver_error::DriverError;
pub use crate::encoder::{short_caller, EncoderConfig, JsonEncoder};
pub use crate::factory::{ConsoleTarget, SinkFactory};
pub use crate::fields::{Field, FieldValue};
pub use crate::logger::{Logger, SyncGuard};
pub use crate::options::{Mode, Options};
pub use crate::registry::DriverRegistry;
pub use crate::sink::Sink;

/// Name of the driver that exists from the construction of a [`Logger`] on.
pub const DEFAULT_DRIVER: &str = "default";

/// File stem that is used for the default driver if [`Options::file_name`] is empty.
pub const DEFAULT_FILE_STEM: &str = "app";

/// Suffix of all log files.
pub const LOG_SUFFIX: &str = "log";

/// Re-exports from log crate
pub use log::{Level, Record};
