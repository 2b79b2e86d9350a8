use chrono::{DateTime, Local};

/// ISO-8601 layout with milliseconds and numeric offset, e.g. `2024-03-17T15:04:05.123+0100`.
pub(crate) const ISO8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Deferred timestamp creation.
///
/// Is used to ensure that a log record that is sent to multiple outputs
/// always uses the same timestamp.
#[derive(Debug)]
pub struct DeferredNow(Option<DateTime<Local>>);
impl Default for DeferredNow {
    fn default() -> Self {
        Self::new()
    }
}

impl DeferredNow {
    /// Constructs a new instance, but does not generate the timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self(None)
    }

    /// Retrieve the timestamp.
    ///
    /// Requires mutability because the first caller will generate the timestamp.
    pub fn now(&mut self) -> &DateTime<Local> {
        self.0.get_or_insert_with(Local::now)
    }

    /// Produces the timestamp in the ISO-8601 layout that is used in the log records.
    pub fn format_iso8601(&mut self) -> String {
        self.now().format(ISO8601_FORMAT).to_string()
    }
}
