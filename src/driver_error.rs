use thiserror::Error;

/// Describes errors in the use of `log_drivers`.
///
/// Note that failures of the log output itself (opening, writing, rotating log files)
/// are not surfaced to the logging caller, but printed to stderr,
/// see [`error_info`](crate::error_info).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DriverError {
    /// An internal invariant does not hold.
    ///
    /// This signals a bug in the construction order rather than a runtime condition,
    /// e.g. the `"default"` driver is missing.
    #[error("invariant violated: {0}")]
    InvariantViolated(&'static str),

    /// No driver is registered under the given name.
    #[error("no driver is registered with name \"{0}\"")]
    UnknownDriver(String),

    /// Flushing failed for the listed drivers; all other drivers were flushed successfully.
    #[error("flushing failed for {} driver(s): {}", .0.len(), flush_failures(.0))]
    Flush(Vec<(String, std::io::Error)>),

    /// The options cannot be parsed from JSON.
    #[error("options cannot be parsed")]
    Json(#[from] serde_json::Error),

    /// The options cannot be parsed from TOML.
    #[cfg_attr(docsrs, doc(cfg(feature = "toml")))]
    #[cfg(feature = "toml")]
    #[error("options cannot be parsed")]
    Toml(#[from] toml::de::Error),

    /// Installing the logger as global logger failed.
    #[error("logger initialization failed")]
    Log(#[from] log::SetLoggerError),
}

fn flush_failures(failures: &[(String, std::io::Error)]) -> String {
    failures
        .iter()
        .map(|(name, e)| format!("{name}: {e}"))
        .collect::<Vec<String>>()
        .join(", ")
}
