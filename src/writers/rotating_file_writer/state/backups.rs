use super::super::{Config, BACKUP_TIMESTAMP_FORMAT};
use crate::util::{eprint_err, eprint_msg, ErrorCode};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use std::{
    path::{Path, PathBuf},
    sync::mpsc::{channel, Sender},
    thread::{Builder as ThreadBuilder, JoinHandle},
};

// Path for the rotated file, e.g. "logs/app-2024-03-17T15-04-05.123.log".
// The timestamp is never older than that of the newest existing backup, otherwise
// the cleanup, which orders by the timestamp in the name, would remove the wrong files.
// Collisions are handled by advancing the timestamp by a millisecond.
pub(super) fn backup_path(config: &Config, now: DateTime<Utc>) -> PathBuf {
    let mut ts = now;
    if let Some(newest) = list_backups(config)
        .ok()
        .and_then(|backups| backups.first().map(|(_, ts)| *ts))
    {
        let next = newest + chrono::Duration::milliseconds(1);
        if ts < next {
            ts = next;
        }
    }
    loop {
        let path = path_with_infix(config, &timestamp_infix(config, &ts));
        if !path.exists() {
            return path;
        }
        ts += chrono::Duration::milliseconds(1);
    }
}

fn timestamp_infix(config: &Config, ts: &DateTime<Utc>) -> String {
    if config.local_time {
        ts.with_timezone(&Local)
            .format(BACKUP_TIMESTAMP_FORMAT)
            .to_string()
    } else {
        ts.format(BACKUP_TIMESTAMP_FORMAT).to_string()
    }
}

fn path_with_infix(config: &Config, infix: &str) -> PathBuf {
    let mut filename = config.file_stem();
    filename.push('-');
    filename.push_str(infix);
    if let Some(ext) = config.extension() {
        filename.push('.');
        filename.push_str(&ext);
    }
    config.directory().join(filename)
}

// Retrieves the timestamp from the name of a rotated file,
// ignores all files with a different name pattern
fn timestamp_from_path(config: &Config, path: &Path) -> Option<DateTime<Utc>> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let rest = filename.strip_prefix(&format!("{}-", config.file_stem()))?;
    let infix = match config.extension() {
        Some(ext) => rest.strip_suffix(&format!(".{ext}"))?,
        None => rest,
    };
    let naive = NaiveDateTime::parse_from_str(infix, BACKUP_TIMESTAMP_FORMAT).ok()?;
    if config.local_time {
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|ts| ts.with_timezone(&Utc))
            .or_else(|| {
                eprint_msg(
                    ErrorCode::Time,
                    &format!("{} has no valid local timestamp, using UTC", path.display()),
                );
                Some(Utc.from_utc_datetime(&naive))
            })
    } else {
        Some(Utc.from_utc_datetime(&naive))
    }
}

// All rotated files of the configured log file, newest first.
pub(super) fn list_backups(config: &Config) -> std::io::Result<Vec<(PathBuf, DateTime<Utc>)>> {
    let prefix = config.directory().join(format!("{}-", config.file_stem()));
    let mut pattern = glob::Pattern::escape(&prefix.to_string_lossy());
    pattern.push('*');
    if let Some(ext) = config.extension() {
        pattern.push('.');
        pattern.push_str(&glob::Pattern::escape(&ext));
    }

    let mut backups = glob::glob(&pattern)
        .map_err(std::io::Error::other)?
        // ignore all files with GlobError
        .filter_map(Result::ok)
        .filter_map(|path| timestamp_from_path(config, &path).map(|ts| (path, ts)))
        .collect::<Vec<(PathBuf, DateTime<Utc>)>>();
    backups.sort_unstable_by(|(_, ts1), (_, ts2)| ts2.cmp(ts1));
    Ok(backups)
}

pub(super) fn remove_outdated_backups(config: &Config) -> std::io::Result<()> {
    let o_cutoff = config.o_max_age_days.and_then(|days| {
        chrono::Duration::from_std(std::time::Duration::from_secs(days.saturating_mul(86_400)))
            .ok()
            .and_then(|max_age| Utc::now().checked_sub_signed(max_age))
    });

    for (index, (path, ts)) in list_backups(config)?.into_iter().enumerate() {
        let too_many = config.o_max_backups.is_some_and(|max| index >= max);
        let too_old = o_cutoff.is_some_and(|cutoff| ts < cutoff);
        if too_many || too_old {
            match std::fs::remove_file(&path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e),
                _ => {}
            }
        }
    }
    Ok(())
}

const CLEANER: &str = "log_drivers-cleanup";

#[derive(Debug)]
pub(super) struct CleanupThreadHandle {
    sender: Sender<MessageToCleanupThread>,
    join_handle: JoinHandle<()>,
}

enum MessageToCleanupThread {
    Act,
    Die,
}
impl CleanupThreadHandle {
    pub(super) fn act(&self) {
        self.sender.send(MessageToCleanupThread::Act).ok();
    }

    pub(super) fn shutdown(self) {
        self.sender.send(MessageToCleanupThread::Die).ok();
        self.join_handle.join().ok();
    }
}

pub(super) fn start_cleanup_thread(config: Config) -> std::io::Result<CleanupThreadHandle> {
    let (sender, receiver) = channel();
    let builder = ThreadBuilder::new()
        .name(CLEANER.to_string())
        .stack_size(512 * 1024);
    Ok(CleanupThreadHandle {
        sender,
        join_handle: builder.spawn(move || {
            while let Ok(MessageToCleanupThread::Act) = receiver.recv() {
                remove_outdated_backups(&config).unwrap_or_else(|e| {
                    eprint_err(ErrorCode::LogFile, "cannot remove rotated log files", &e);
                });
            }
        })?,
    })
}

#[cfg(test)]
mod test {
    use super::{backup_path, list_backups, remove_outdated_backups, timestamp_from_path};
    use crate::writers::rotating_file_writer::{Config, DEFAULT_MAX_SIZE};
    use chrono::{TimeZone, Utc};
    use std::path::{Path, PathBuf};

    fn config(dir: &Path) -> Config {
        Config {
            path: dir.join("worker.log"),
            max_size: DEFAULT_MAX_SIZE,
            o_max_age_days: None,
            o_max_backups: None,
            buffered: false,
            local_time: false,
        }
    }

    #[test]
    fn test_backup_name() {
        let config = config(Path::new("logs"));
        let ts = Utc.with_ymd_and_hms(2024, 3, 17, 15, 4, 5).unwrap();
        let path = backup_path(&config, ts);
        assert_eq!(path, PathBuf::from("logs/worker-2024-03-17T15-04-05.000.log"));
        assert_eq!(timestamp_from_path(&config, &path), Some(ts));
    }

    #[test]
    fn test_foreign_files_are_ignored() {
        let config = config(Path::new("logs"));
        for name in [
            "logs/worker.log",
            "logs/worker-x.log",
            "logs/worker-x-2024-03-17T15-04-05.000.log",
            "logs/other-2024-03-17T15-04-05.000.log",
            "logs/worker-2024-03-17T15-04-05.000.txt",
        ] {
            assert_eq!(timestamp_from_path(&config, Path::new(name)), None, "{name}");
        }
    }

    #[test]
    fn test_collision_free() {
        let dir = temp_dir::TempDir::new().unwrap();
        let config = config(dir.path());
        let ts = Utc.with_ymd_and_hms(2024, 3, 17, 15, 4, 5).unwrap();
        let first = backup_path(&config, ts);
        std::fs::write(&first, b"x").unwrap();
        let second = backup_path(&config, ts);
        assert_ne!(first, second);
        assert!(second
            .to_string_lossy()
            .ends_with("worker-2024-03-17T15-04-05.001.log"));
    }

    #[test]
    fn test_never_older_than_newest_backup() {
        let dir = temp_dir::TempDir::new().unwrap();
        let config = config(dir.path());
        let newest = Utc.with_ymd_and_hms(2024, 3, 17, 15, 4, 5).unwrap();
        std::fs::write(backup_path(&config, newest), b"x").unwrap();

        // a name freed by the cleanup, or a clock going backwards, must not be reused
        let earlier = newest - chrono::Duration::milliseconds(3);
        let path = backup_path(&config, earlier);
        assert!(path
            .to_string_lossy()
            .ends_with("worker-2024-03-17T15-04-05.001.log"));
        assert_eq!(
            timestamp_from_path(&config, &path),
            Some(newest + chrono::Duration::milliseconds(1))
        );

        // later timestamps are taken as they are
        let later = newest + chrono::Duration::seconds(10);
        assert_eq!(timestamp_from_path(&config, &backup_path(&config, later)), Some(later));
    }

    #[test]
    fn test_remove_by_count_and_age() {
        let dir = temp_dir::TempDir::new().unwrap();
        let mut config = config(dir.path());
        let now = Utc::now();
        // 5 backups, 20, 10, 3, 2 and 1 days old
        for days in [20, 10, 3, 2, 1] {
            let path = backup_path(&config, now - chrono::Duration::days(days));
            std::fs::write(path, b"x").unwrap();
        }
        // a foreign file that must survive
        std::fs::write(dir.path().join("worker-notes.log"), b"x").unwrap();
        assert_eq!(list_backups(&config).unwrap().len(), 5);

        config.o_max_age_days = Some(7);
        remove_outdated_backups(&config).unwrap();
        assert_eq!(list_backups(&config).unwrap().len(), 3);

        config.o_max_backups = Some(1);
        remove_outdated_backups(&config).unwrap();
        let remaining = list_backups(&config).unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(now - remaining[0].1 < chrono::Duration::days(2));
        assert!(dir.path().join("worker-notes.log").exists());
    }
}
