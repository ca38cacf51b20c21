// Bookmark Board platform paths for Linux
// Config: ~/.config/bookmark-board
// Data:   ~/.local/share/bookmark-board

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "bookmark-board";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Uses `$XDG_CONFIG_HOME/bookmark-board` if set, otherwise `~/.config/bookmark-board`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg).join(APP_DIR),
        Err(_) => home_dir().join(".config").join(APP_DIR),
    }
}

/// Uses `$XDG_DATA_HOME/bookmark-board` if set, otherwise `~/.local/share/bookmark-board`.
pub fn get_data_dir() -> PathBuf {
    match env::var("XDG_DATA_HOME") {
        Ok(xdg) => PathBuf::from(xdg).join(APP_DIR),
        Err(_) => home_dir().join(".local").join("share").join(APP_DIR),
    }
}
