mod backups;

use super::Config;
use crate::util::{eprint_err, ErrorCode};
use backups::CleanupThreadHandle;
use chrono::Utc;
use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::PathBuf,
};

enum Inner {
    Initial,
    Active {
        writer: Box<dyn Write + Send>,
        size: u64,
    },
}
impl std::fmt::Debug for Inner {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Self::Initial => f.write_str("Initial"),
            Self::Active { size, .. } => f.write_fmt(format_args!("Active(<some-writer>, {size})")),
        }
    }
}

// The mutable state of a RotatingFileWriter.
#[derive(Debug)]
pub(super) struct State {
    config: Config,
    inner: Inner,
    cleanup_in_background_thread: bool,
    o_cleanup_thread_handle: Option<CleanupThreadHandle>,
}
impl State {
    pub(super) fn new(config: Config, cleanup_in_background_thread: bool) -> Self {
        Self {
            config,
            inner: Inner::Initial,
            cleanup_in_background_thread,
            o_cleanup_thread_handle: None,
        }
    }

    pub(super) fn config(&self) -> &Config {
        &self.config
    }

    pub(super) fn write_buffer(&mut self, buf: &[u8]) -> std::io::Result<()> {
        let len = buf.len() as u64;
        if len > self.config.max_size {
            return Err(std::io::Error::other(format!(
                "write length {len} exceeds maximum file size {}",
                self.config.max_size
            )));
        }

        if let Inner::Initial = self.inner {
            self.open_existing_or_new(len)?;
        }

        // rotate if necessary
        if let Inner::Active { size, .. } = self.inner {
            if size + len > self.config.max_size {
                self.rotate()?;
            }
        }

        if let Inner::Active {
            ref mut writer,
            ref mut size,
        } = self.inner
        {
            writer.write_all(buf)?;
            *size += len;
        }
        Ok(())
    }

    pub(super) fn flush(&mut self) -> std::io::Result<()> {
        if let Inner::Active { ref mut writer, .. } = self.inner {
            writer.flush()
        } else {
            Ok(())
        }
    }

    // Closes the current file, moves it away, and continues with a fresh file.
    pub(super) fn rotate(&mut self) -> std::io::Result<()> {
        self.close();
        self.open_new()?;
        self.trigger_cleanup();
        Ok(())
    }

    pub(super) fn existing_backups(&self) -> std::io::Result<Vec<PathBuf>> {
        Ok(backups::list_backups(&self.config)?
            .into_iter()
            .map(|(path, _)| path)
            .collect())
    }

    pub(super) fn shutdown(&mut self) {
        self.close();
        if let Some(cleanup_thread_handle) = self.o_cleanup_thread_handle.take() {
            cleanup_thread_handle.shutdown();
        }
    }

    fn open_existing_or_new(&mut self, write_len: u64) -> std::io::Result<()> {
        match std::fs::metadata(&self.config.path) {
            Ok(md) if md.len() + write_len >= self.config.max_size => {
                return self.rotate();
            }
            Ok(md) => match OpenOptions::new().append(true).open(&self.config.path) {
                Ok(file) => self.activate(file, md.len()),
                Err(e) => {
                    eprint_err(
                        ErrorCode::LogFile,
                        "cannot append to existing log file, starting a new one",
                        &e,
                    );
                    self.open_new()?;
                }
            },
            Err(_) => self.open_new()?,
        }
        self.trigger_cleanup();
        Ok(())
    }

    fn open_new(&mut self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.config.directory())?;
        if self.config.path.exists() {
            let backup = backups::backup_path(&self.config, Utc::now());
            std::fs::rename(&self.config.path, backup)?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.config.path)?;
        self.activate(file, 0);
        Ok(())
    }

    fn activate(&mut self, file: File, size: u64) {
        let writer: Box<dyn Write + Send> = if self.config.buffered {
            Box::new(BufWriter::new(file))
        } else {
            Box::new(file)
        };
        self.inner = Inner::Active { writer, size };
    }

    fn close(&mut self) {
        if let Inner::Active { ref mut writer, .. } = self.inner {
            writer.flush().unwrap_or_else(|e| {
                eprint_err(ErrorCode::Flush, "flushing log file before closing failed", &e);
            });
        }
        self.inner = Inner::Initial;
    }

    fn trigger_cleanup(&mut self) {
        if !self.config.does_cleanup() {
            return;
        }
        if self.cleanup_in_background_thread {
            if self.o_cleanup_thread_handle.is_none() {
                match backups::start_cleanup_thread(self.config.clone()) {
                    Ok(handle) => self.o_cleanup_thread_handle = Some(handle),
                    Err(e) => {
                        eprint_err(ErrorCode::LogFile, "cannot start cleanup thread", &e);
                    }
                }
            }
            if let Some(ref handle) = self.o_cleanup_thread_handle {
                handle.act();
                return;
            }
        }
        // no background thread: clean up in the current thread
        backups::remove_outdated_backups(&self.config).unwrap_or_else(|e| {
            eprint_err(ErrorCode::LogFile, "cannot remove rotated log files", &e);
        });
    }
}
