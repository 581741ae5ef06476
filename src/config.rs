//! Configuration file support
//!
//! Loads settings from ~/.pymaker.toml (or %USERPROFILE%\.pymaker.toml on Windows)
//!
//! Example:
//! ```text
//! # pymaker configuration
//! base-folder = "/home/me/Desktop/snippets"
//! subfolder = "scratch"
//! file-name = "main.py"
//! highlight-mode = "lexer"   # or "overlay"
//! line-numbers = true
//! tab-width = 4
//! gutter-margin = 1
//! gutter-padding = 1
//! ```

use std::fs;
use std::path::PathBuf;

use toml::{Table, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::syntax::HighlightMode;

/// Configuration settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Folder the file is saved under
    pub base_folder: PathBuf,
    /// Optional folder created inside `base_folder`
    pub subfolder: String,
    /// Name of the saved file
    pub file_name: String,
    /// Extension appended when the file name lacks it
    pub extension: String,
    pub highlight_mode: HighlightMode,
    /// Whether to show the line-number gutter
    pub show_line_numbers: bool,
    /// Tab width for display and for the Tab key
    pub tab_width: usize,
    /// Fixed part of the gutter width, in cells
    pub gutter_margin: i32,
    /// Cells between the line numbers and the text
    pub gutter_padding: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_folder: default_base_folder(),
            subfolder: String::new(),
            file_name: "main.py".to_string(),
            extension: "py".to_string(),
            highlight_mode: HighlightMode::default(),
            show_line_numbers: true,
            tab_width: 4,
            gutter_margin: 1,
            gutter_padding: 1,
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }

    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}

/// The desktop if there is one, else home, else the working directory
fn default_base_folder() -> PathBuf {
    match home_dir() {
        Some(home) => {
            let desktop = home.join("Desktop");
            if desktop.is_dir() {
                desktop
            } else {
                home
            }
        }
        None => PathBuf::from("."),
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".pymaker.toml"))
    }

    /// Load configuration from file; a missing or broken file yields defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Config::default();
        };
        let Ok(contents) = fs::read_to_string(&path) else {
            debug!(path = %path.display(), "no config file, using defaults");
            return Config::default();
        };
        match Self::from_toml(&contents) {
            Ok(config) => {
                debug!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring config file");
                Config::default()
            }
        }
    }

    /// Parse a TOML document on top of the defaults
    pub fn from_toml(contents: &str) -> Result<Self> {
        let table: Table = contents.parse()?;
        let mut config = Config::default();
        config.apply(&table)?;
        Ok(config)
    }

    /// Apply settings from a parsed table; unknown keys are ignored
    fn apply(&mut self, table: &Table) -> Result<()> {
        if let Some(value) = get_str(table, "base-folder")? {
            self.base_folder = expand_home(value);
        }

        if let Some(value) = get_str(table, "subfolder")? {
            self.subfolder = value.trim().to_string();
        }

        if let Some(value) = get_str(table, "file-name")? {
            self.file_name = value.trim().to_string();
        }

        if let Some(value) = get_str(table, "extension")? {
            self.extension = value.trim().trim_start_matches('.').to_string();
        }

        if let Some(value) = get_str(table, "highlight-mode")? {
            self.highlight_mode = HighlightMode::from_name(value)
                .ok_or_else(|| Error::InvalidConfig(format!("highlight-mode = {value:?}")))?;
        }

        if let Some(value) = table.get("line-numbers") {
            self.show_line_numbers = value
                .as_bool()
                .ok_or_else(|| type_error("line-numbers", "a boolean"))?;
        }

        if let Some(n) = get_int(table, "tab-width")? {
            self.tab_width = n.clamp(1, 16) as usize; // Between 1 and 16
        }

        if let Some(n) = get_int(table, "gutter-margin")? {
            self.gutter_margin = n.clamp(0, 64) as i32;
        }

        if let Some(n) = get_int(table, "gutter-padding")? {
            self.gutter_padding = n.clamp(0, 64) as i32;
        }

        Ok(())
    }
}

fn type_error(key: &str, expected: &str) -> Error {
    Error::InvalidConfig(format!("{key} must be {expected}"))
}

fn get_str<'a>(table: &'a Table, key: &str) -> Result<Option<&'a str>> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(type_error(key, "a string")),
    }
}

fn get_int(table: &Table, key: &str) -> Result<Option<i64>> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::Integer(n)) => Ok(Some(*n)),
        Some(_) => Err(type_error(key, "an integer")),
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let contents = r#"
# Comment
base-folder = "/tmp/code"
subfolder = " demo "
file-name = "app"
extension = ".py"
highlight-mode = "overlay"
line-numbers = false
tab-width = 2
gutter-margin = 3
unknown-key = 1
        "#;

        let config = Config::from_toml(contents).unwrap();
        assert_eq!(config.base_folder, PathBuf::from("/tmp/code"));
        assert_eq!(config.subfolder, "demo");
        assert_eq!(config.file_name, "app");
        assert_eq!(config.extension, "py");
        assert_eq!(config.highlight_mode, HighlightMode::Overlay);
        assert!(!config.show_line_numbers);
        assert_eq!(config.tab_width, 2);
        assert_eq!(config.gutter_margin, 3);
        assert_eq!(config.gutter_padding, 1);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_clamps_numbers() {
        let config = Config::from_toml("tab-width = 99\ngutter-margin = -4").unwrap();
        assert_eq!(config.tab_width, 16);
        assert_eq!(config.gutter_margin, 0);
    }

    #[test]
    fn test_rejects_wrong_types() {
        assert!(matches!(
            Config::from_toml("tab-width = \"four\""),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::from_toml("line-numbers = 1"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::from_toml("highlight-mode = \"rainbow\""),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(Config::from_toml("tab-width = "), Err(Error::Config(_))));
    }
}
