use crate::{DeferredNow, Field};
use log::Level;
use std::io::Write;

/// Key names and line ending of the JSON records.
///
/// The default mapping is the one used by all drivers:
///
/// | content            | key      | rendering                                        |
/// |--------------------|----------|--------------------------------------------------|
/// | level              | `level`  | capitalized, e.g. `"INFO"`                       |
/// | timestamp          | `time`   | ISO-8601, e.g. `"2024-03-17T15:04:05.123+0100"`  |
/// | caller location    | `caller` | short form, e.g. `"src/main.rs:17"`              |
/// | message            | `msg`    | as given                                         |
///
/// The structured fields follow in the order of the call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncoderConfig {
    /// Key of the level.
    pub level_key: &'static str,
    /// Key of the timestamp.
    pub time_key: &'static str,
    /// Key of the caller location.
    pub caller_key: &'static str,
    /// Key of the message.
    pub message_key: &'static str,
    /// Written after each record.
    pub line_ending: &'static [u8],
}
impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            level_key: "level",
            time_key: "time",
            caller_key: "caller",
            message_key: "msg",
            line_ending: b"\n",
        }
    }
}

/// Serializes log records into single-line JSON objects.
#[derive(Clone, Debug, Default)]
pub struct JsonEncoder {
    config: EncoderConfig,
}
impl JsonEncoder {
    /// Creates an encoder with the given key mapping.
    #[must_use]
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// The key mapping of this encoder.
    #[must_use]
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Appends one record, including the line ending, to `buf`.
    ///
    /// # Errors
    ///
    /// Only if a key or value cannot be serialized, which should not happen.
    pub fn encode(
        &self,
        buf: &mut Vec<u8>,
        now: &mut DeferredNow,
        level: Level,
        o_caller: Option<(&str, u32)>,
        msg: &str,
        fields: &[Field],
    ) -> std::io::Result<()> {
        buf.write_all(b"{")?;
        write_key(buf, self.config.level_key)?;
        write_str(buf, level.as_str())?;
        buf.write_all(b",")?;
        write_key(buf, self.config.time_key)?;
        write_str(buf, &now.format_iso8601())?;
        if let Some((file, line)) = o_caller {
            buf.write_all(b",")?;
            write_key(buf, self.config.caller_key)?;
            write_str(buf, &short_caller(file, line))?;
        }
        buf.write_all(b",")?;
        write_key(buf, self.config.message_key)?;
        write_str(buf, msg)?;
        for field in fields {
            buf.write_all(b",")?;
            write_key(buf, field.key())?;
            serde_json::to_writer(&mut *buf, &field.value().to_json())?;
        }
        buf.write_all(b"}")?;
        buf.write_all(self.config.line_ending)
    }
}

fn write_key(buf: &mut Vec<u8>, key: &str) -> std::io::Result<()> {
    write_str(buf, key)?;
    buf.write_all(b":")
}

fn write_str(buf: &mut Vec<u8>, s: &str) -> std::io::Result<()> {
    serde_json::to_writer(buf, s).map_err(std::io::Error::from)
}

/// Renders a source location in short form, i.e. only the file's immediate folder,
/// the file name, and the line: `src/registry.rs:42`.
#[must_use]
pub fn short_caller(file: &str, line: u32) -> String {
    let is_sep = |c: char| c == '/' || c == '\\';
    let start = file
        .rfind(is_sep)
        .and_then(|last| file[..last].rfind(is_sep))
        .map_or(0, |second_last| second_last + 1);
    format!("{}:{line}", &file[start..])
}
