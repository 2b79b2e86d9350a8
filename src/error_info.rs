//! Error codes of `log_drivers`.
//!
//! Failures of the log output are never returned to the code that logs.
//! They are instead printed to stderr, together with one of the following error codes.
//! More details on them can be found here.
//!
//! ## `Write`
//!
//! Writing the log line to the output failed.
//!
//! Example:
//!
//! ```text
//! [log_drivers][ERRCODE::Write] writing log line failed, caused by ...
//! ```
//!
//! Possible reasons are a full disk, missing permissions in the log directory,
//! or a single log record that is larger than the configured maximum file size.
//! The record is lost; the next log call tries again.
//!
//! ## `Flush`
//!
//! Explicit flushing of buffered log lines to the output failed,
//! e.g. with [`Logger::sync`](crate::Logger::sync).
//! Flushing continues with the other drivers.
//! Use [`Logger::try_sync`](crate::Logger::try_sync) to get the failures returned as a batch.
//!
//! ## `Format`
//!
//! A log record could not be serialized.
//! Most likely the root cause is a `Display` implementation of a logged value
//! that returned an error.
//!
//! ## `LogFile`
//!
//! The rotating file writer is not able to open, rotate, or clean up a log file.
//! The reason should be printed as well.
//!
//! ## `Poison`
//!
//! Log entries can be written by all threads of your program. Loggers thus must be thread-safe,
//! by keeping their mutable parts in `Mutex`es, `RwLocks`, etc. In case that a thread panics
//! while owning one of these locks, the lock is subsequently considered "poisoned".
//!
//! Most likely the root cause for this is some panic! in a `Debug` or `Display` implementation
//! of a logged object.
//!
//! ## `Time`
//!
//! The local time offset could not be determined, so that the timestamp of a rotated file
//! falls back to UTC.
