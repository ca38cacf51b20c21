// Bookmark Board platform abstraction
// Provides platform-specific config and data paths for Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "BOOKMARK_BOARD_DATA_DIR";

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `~/.config/bookmark-board` (or `$XDG_CONFIG_HOME/bookmark-board`)
/// - **macOS**: `~/Library/Application Support/BookmarkBoard`
/// - **Windows**: `%APPDATA%/BookmarkBoard`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the directory holding the local order database.
///
/// `$BOOKMARK_BOARD_DATA_DIR` wins when set and non-empty; otherwise:
/// - **Linux**: `~/.local/share/bookmark-board` (or `$XDG_DATA_HOME/bookmark-board`)
/// - **macOS**: `~/Library/Application Support/BookmarkBoard`
/// - **Windows**: `%APPDATA%/BookmarkBoard`
pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}
