use crate::deferred_now::ISO8601_FORMAT;
use chrono::{DateTime, Local};
use serde_json::Value;
use std::borrow::Cow;
use std::time::Duration;

/// Typed value of a structured [`Field`].
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    I64(i64),
    /// An unsigned integer.
    U64(u64),
    /// A floating point number; non-finite values are written as strings.
    F64(f64),
    /// A string.
    Str(String),
    /// A point in time, written in ISO-8601 layout.
    Time(DateTime<Local>),
    /// A duration, written as (fractional) seconds.
    Duration(Duration),
    /// An error, written with its `Display` representation.
    Error(String),
    /// Any serializable value.
    Json(Value),
}
impl FieldValue {
    /// Converts the value into its JSON representation in the log record.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::I64(i) => Value::from(*i),
            Self::U64(u) => Value::from(*u),
            Self::F64(f) => float(*f),
            Self::Str(s) | Self::Error(s) => Value::String(s.clone()),
            Self::Time(t) => Value::String(t.format(ISO8601_FORMAT).to_string()),
            Self::Duration(d) => float(d.as_secs_f64()),
            Self::Json(v) => v.clone(),
        }
    }
}

fn float(f: f64) -> Value {
    serde_json::Number::from_f64(f).map_or_else(|| Value::String(f.to_string()), Value::Number)
}

/// A named, typed value that is added to a log record.
///
/// ```rust
/// use log_drivers::Field;
///
/// let fields = [
///     Field::string("user", "alice"),
///     Field::int("attempt", 3),
///     Field::time("loadTime", chrono::Local::now()),
///     Field::duration("took", std::time::Duration::from_millis(250)),
/// ];
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    key: Cow<'static, str>,
    value: FieldValue,
}
impl Field {
    /// Constructs a field from a key and an already typed value.
    #[must_use]
    pub fn new<K: Into<Cow<'static, str>>>(key: K, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// A boolean field.
    #[must_use]
    pub fn bool<K: Into<Cow<'static, str>>>(key: K, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    /// A signed integer field.
    #[must_use]
    pub fn int<K: Into<Cow<'static, str>>>(key: K, value: i64) -> Self {
        Self::new(key, FieldValue::I64(value))
    }

    /// An unsigned integer field.
    #[must_use]
    pub fn uint<K: Into<Cow<'static, str>>>(key: K, value: u64) -> Self {
        Self::new(key, FieldValue::U64(value))
    }

    /// A floating point field.
    #[must_use]
    pub fn float<K: Into<Cow<'static, str>>>(key: K, value: f64) -> Self {
        Self::new(key, FieldValue::F64(value))
    }

    /// A string field.
    #[must_use]
    pub fn string<K: Into<Cow<'static, str>>, S: Into<String>>(key: K, value: S) -> Self {
        Self::new(key, FieldValue::Str(value.into()))
    }

    /// A timestamp field.
    #[must_use]
    pub fn time<K: Into<Cow<'static, str>>>(key: K, value: DateTime<Local>) -> Self {
        Self::new(key, FieldValue::Time(value))
    }

    /// A duration field, written as seconds.
    #[must_use]
    pub fn duration<K: Into<Cow<'static, str>>>(key: K, value: Duration) -> Self {
        Self::new(key, FieldValue::Duration(value))
    }

    /// An error field, under the key `"error"`.
    #[must_use]
    pub fn error(err: &dyn std::error::Error) -> Self {
        Self::new("error", FieldValue::Error(err.to_string()))
    }

    /// A field with an arbitrary serializable value.
    ///
    /// Values that cannot be serialized are written as their error message.
    #[must_use]
    pub fn any<K: Into<Cow<'static, str>>, T: serde::Serialize>(key: K, value: &T) -> Self {
        let value = serde_json::to_value(value)
            .map_or_else(|e| FieldValue::Error(e.to_string()), FieldValue::Json);
        Self::new(key, value)
    }

    /// The key of the field.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value of the field.
    #[must_use]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }
}
