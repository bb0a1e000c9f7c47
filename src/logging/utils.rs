//! Helpers shared by the console formatter, the file layer and the prompt.
use std::path::PathBuf;

/// Header timestamp in the log file.
pub(super) const DATETIME: &str = "%Y-%m-%d %H:%M:%S";
/// Per-line timestamp in the log file.
pub(super) const TIME: &str = "%H:%M:%S";

/// Current UTC time rendered with a `chrono` format string.
pub(super) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}

/// Position inside an escape sequence while scanning.
#[derive(Clone, Copy)]
enum Scan {
    Text,
    /// Just saw `ESC`.
    Escape,
    /// Inside `ESC [`, waiting for the final byte.
    Csi,
}

/// Remove terminal escape sequences so messages are plain text in the log
/// file.
///
/// CSI sequences (`ESC [` ... final byte in `@`..=`~`) are dropped whole; any
/// other `ESC x` pair is dropped as two characters.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut state = Scan::Text;
    s.chars()
        .filter(|&c| {
            let (next, keep) = match (state, c) {
                (Scan::Text, '\x1b') => (Scan::Escape, false),
                (Scan::Text, _) => (Scan::Text, true),
                (Scan::Escape, '[') => (Scan::Csi, false),
                (Scan::Escape, _) => (Scan::Text, false),
                (Scan::Csi, '@'..='~') => (Scan::Text, false),
                (Scan::Csi, _) => (Scan::Csi, false),
            };
            state = next;
            keep
        })
        .collect()
}

/// Width used for the rule drawn above each conflict diff.
///
/// The terminal is asked first, then `COLUMNS`; 80 otherwise.
#[must_use]
pub fn terminal_columns() -> usize {
    terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| usize::from(w))
        .or_else(|| std::env::var("COLUMNS").ok()?.parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or(80)
}

/// `<cache>/framework-installer/<command>.log`, creating the directory.
///
/// The cache root is `XDG_CACHE_HOME`, else `~/.cache`.  `None` when the
/// directory cannot be created.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let cache = std::env::var_os("XDG_CACHE_HOME").map_or_else(
        || {
            std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map_or_else(|| PathBuf::from("."), PathBuf::from)
                .join(".cache")
        },
        PathBuf::from,
    );
    let dir = cache.join("framework-installer");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}
