use std::cell::RefCell;
use std::io::Write;

#[derive(Copy, Clone, Debug)]
pub(crate) enum ErrorCode {
    Write,
    Flush,
    Format,
    LogFile,
    Poison,
    Time,
}
impl ErrorCode {
    fn as_index(self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Flush => "flush",
            Self::Format => "format",
            Self::LogFile => "logfile",
            Self::Poison => "poison",
            Self::Time => "time",
        }
    }
}

pub(crate) fn eprint_err(error_code: ErrorCode, msg: &str, err: &dyn std::error::Error) {
    let s = format!(
        "[log_drivers][ERRCODE::{code:?}] {msg}, caused by {err:?}\n    \
         See https://docs.rs/log_drivers/latest/log_drivers/error_info/index.html#{code_lc}",
        msg = msg,
        err = err,
        code = error_code,
        code_lc = error_code.as_index(),
    );
    try_to_write(&s);
}

pub(crate) fn eprint_msg(error_code: ErrorCode, msg: &str) {
    let s = format!(
        "[log_drivers][ERRCODE::{code:?}] {msg}\n    \
         See https://docs.rs/log_drivers/latest/log_drivers/error_info/index.html#{code_lc}",
        msg = msg,
        code = error_code,
        code_lc = error_code.as_index(),
    );
    try_to_write(&s);
}

// stderr may be closed, which must not make logging panic
fn try_to_write(s: &str) {
    let w = std::io::stderr();
    let mut wl = w.lock();
    wl.write_all(s.as_bytes()).ok();
    wl.write_all(b"\n").ok();
    wl.flush().ok();
}

pub(crate) fn io_err(s: &'static str) -> std::io::Error {
    std::io::Error::other(s)
}

// Thread-local buffer
pub(crate) fn buffer_with<F>(f: F)
where
    F: FnOnce(&RefCell<Vec<u8>>),
{
    thread_local! {
        static BUFFER: RefCell<Vec<u8>> = RefCell::new(Vec::with_capacity(200));
    }
    BUFFER.with(f);
}
