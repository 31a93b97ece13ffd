use std::any::Any;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "wsl-file-search.log";
const ARCHIVE_PREFIX: &str = "wsl-file-search-";
const MAX_LOG_BYTES: u64 = 1_000_000;
const MAX_ARCHIVES: usize = 5;

pub const LOG_FILTER_ENV: &str = "WSL_FILE_SEARCH_LOG";

static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

pub fn logs_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("wsl-file-search")
        .join("logs")
}

/// Routes `tracing` output into a size-rotated file. Stdout belongs to the
/// launcher protocol, so nothing is ever logged there.
pub fn init() -> Result<(), std::io::Error> {
    init_in(&logs_dir())
}

pub fn init_in(log_dir: &Path) -> Result<(), std::io::Error> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(LOG_FILE_NAME);
    rotate_if_needed(&log_path, log_dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (tests, repeated init); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();

    install_panic_hook();
    Ok(())
}

/// Moves a full log aside as `<prefix><unix seconds>.log` and drops the
/// oldest archives past [`MAX_ARCHIVES`].
fn rotate_if_needed(log_path: &Path, log_dir: &Path) -> Result<(), std::io::Error> {
    let size = match fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => 0,
        Err(err) => return Err(err),
    };
    if size < MAX_LOG_BYTES {
        return Ok(());
    }

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs());
    fs::rename(log_path, log_dir.join(format!("{ARCHIVE_PREFIX}{stamp}.log")))?;
    prune_old_archives(log_dir)
}

fn is_archive(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(ARCHIVE_PREFIX) && name.ends_with(".log"))
}

fn prune_old_archives(log_dir: &Path) -> Result<(), std::io::Error> {
    let mut archives: Vec<PathBuf> = fs::read_dir(log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| is_archive(path))
        .collect();

    // Stamps share a width, so name order is age order.
    archives.sort_unstable();
    let excess = archives.len().saturating_sub(MAX_ARCHIVES);
    for stale in archives.drain(..excess) {
        if let Err(error) = fs::remove_file(&stale) {
            tracing::warn!(path = %stale.display(), %error, "could not remove old log");
        }
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map_or_else(|| "unknown".to_string(), |at| format!("{}:{}", at.file(), at.line()));
            tracing::error!(%location, "panic: {}", panic_message(info.payload()));
            previous(info);
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::{
        logs_dir, panic_message, prune_old_archives, rotate_if_needed, LOG_FILE_NAME,
        MAX_LOG_BYTES,
    };

    #[test]
    fn logs_dir_uses_plugin_directory() {
        let dir = logs_dir();
        assert!(dir.to_string_lossy().contains("wsl-file-search"));
    }

    #[test]
    fn small_or_missing_log_is_left_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_path = dir.path().join(LOG_FILE_NAME);
        rotate_if_needed(&log_path, dir.path()).expect("missing log");

        std::fs::write(&log_path, b"line\n").expect("write log");
        rotate_if_needed(&log_path, dir.path()).expect("small log");
        assert!(log_path.exists());
    }

    #[test]
    fn panic_message_reads_both_payload_kinds() {
        let borrowed: Box<dyn std::any::Any + Send> = Box::new("static");
        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(borrowed.as_ref()), "static");
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }

    #[test]
    fn oversized_log_is_archived() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_path = dir.path().join(LOG_FILE_NAME);
        std::fs::write(&log_path, vec![b'x'; MAX_LOG_BYTES as usize]).expect("write log");

        rotate_if_needed(&log_path, dir.path()).expect("rotate");

        assert!(!log_path.exists());
        let archived = std::fs::read_dir(dir.path()).expect("read dir").count();
        assert_eq!(archived, 1);
    }

    #[test]
    fn keeps_only_newest_archives() {
        let dir = tempfile::tempdir().expect("tempdir");
        for stamp in 100..108 {
            let name = format!("wsl-file-search-{stamp}.log");
            std::fs::write(dir.path().join(name), b"old").expect("write archive");
        }

        prune_old_archives(dir.path()).expect("prune");

        let mut left: Vec<String> = std::fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(left.len(), 5);
        assert_eq!(left[0], "wsl-file-search-103.log");
    }
}
