//! Path resolution for the data directory and files inside it.
//!
//! The data directory holds the settings file, the log file and the default
//! export target. It is resolved in this order:
//!
//! 1. `data_dir` from the configuration (a leading `~` expands to `$HOME`)
//! 2. `$XDG_DATA_HOME/versenav`
//! 3. `$HOME/.local/share/versenav`
//! 4. `.versenav` relative to the working directory

use std::path::PathBuf;

/// Directory name used below the platform data directories.
pub const APP_DIR_NAME: &str = "versenav";

/// Returns the data directory, reading `XDG_DATA_HOME` and `HOME` from the
/// environment.
#[must_use]
pub fn get_data_dir(configured: Option<&str>) -> PathBuf {
    let xdg = std::env::var("XDG_DATA_HOME").ok();
    let home = std::env::var("HOME").ok();
    resolve_data_dir(configured, xdg.as_deref(), home.as_deref())
}

/// Environment-independent form of [`get_data_dir`].
///
/// # Examples
///
/// ```
/// use versenav::infrastructure::resolve_data_dir;
/// use std::path::PathBuf;
///
/// assert_eq!(
///     resolve_data_dir(None, None, Some("/home/ruth")),
///     PathBuf::from("/home/ruth/.local/share/versenav")
/// );
/// assert_eq!(
///     resolve_data_dir(Some("~/bible"), None, Some("/home/ruth")),
///     PathBuf::from("/home/ruth/bible")
/// );
/// ```
#[must_use]
pub fn resolve_data_dir(configured: Option<&str>, xdg_data_home: Option<&str>, home: Option<&str>) -> PathBuf {
    if let Some(dir) = configured.filter(|d| !d.is_empty()) {
        return PathBuf::from(expand_tilde(dir, home));
    }
    if let Some(xdg) = xdg_data_home.filter(|d| !d.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR_NAME);
    }
    match home.filter(|h| !h.is_empty()) {
        Some(home) => PathBuf::from(home).join(".local").join("share").join(APP_DIR_NAME),
        None => PathBuf::from(format!(".{APP_DIR_NAME}")),
    }
}

/// Expands a leading `~` to `home`. Paths are returned unchanged when no home
/// directory is known.
#[must_use]
pub fn expand_tilde(path: &str, home: Option<&str>) -> String {
    match home {
        Some(home) if path == "~" => home.to_string(),
        Some(home) if path.starts_with("~/") => path.replacen('~', home, 1),
        _ => path.to_string(),
    }
}
