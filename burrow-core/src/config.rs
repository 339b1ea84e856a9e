//! Configuration for burrow

use crate::error::BurrowError;
use crate::navigate::NavigatorOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration as TOML
pub const DEFAULT_CONFIG: &str = r#"# Burrow Configuration

[open]
# Files with this extension open in the viewer, everything else in the editor
document_extension = "pdf"
viewer = "zathura"
editor = "vi"

[keys]
# Single characters; control keys are written as unicode escapes
quit = "\u0003"        # Ctrl-C
new_session = "\u000c" # Ctrl-L
ascend = "/"

[display]
# Index dotfiles
show_hidden = true
# Highlight directories and symlinks
color = true

[output]
# The final directory is written here on quit, for the shell to cd into
result_file = "/tmp/burrow-lastdir"

[log]
# Used when RUST_LOG is unset
level = "info"
# Logs are only written when a file is given
# file = "/tmp/burrow.log"
"#;

/// Burrow configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub open: OpenConfig,
    #[serde(default)]
    pub keys: KeyConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenConfig {
    #[serde(default = "default_document_extension")]
    pub document_extension: String,
    #[serde(default = "default_viewer")]
    pub viewer: String,
    #[serde(default = "default_editor")]
    pub editor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConfig {
    #[serde(default = "default_quit_key")]
    pub quit: String,
    #[serde(default = "default_new_session_key")]
    pub new_session: String,
    #[serde(default = "default_ascend_key")]
    pub ascend: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub show_hidden: bool,
    #[serde(default = "default_true")]
    pub color: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_result_file")]
    pub result_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

// Default value functions
fn default_document_extension() -> String {
    "pdf".to_string()
}
fn default_viewer() -> String {
    "zathura".to_string()
}
fn default_editor() -> String {
    "vi".to_string()
}
fn default_quit_key() -> String {
    "\u{3}".to_string()
}
fn default_new_session_key() -> String {
    "\u{c}".to_string()
}
fn default_ascend_key() -> String {
    "/".to_string()
}
fn default_true() -> bool {
    true
}
fn default_result_file() -> PathBuf {
    PathBuf::from("/tmp/burrow-lastdir")
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for OpenConfig {
    fn default() -> Self {
        Self {
            document_extension: default_document_extension(),
            viewer: default_viewer(),
            editor: default_editor(),
        }
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            quit: default_quit_key(),
            new_session: default_new_session_key(),
            ascend: default_ascend_key(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_hidden: true,
            color: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            result_file: default_result_file(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| BurrowError::ConfigParse(e.to_string()))
    }

    /// Write the default config to `path`, refusing to overwrite
    pub fn init(path: &Path) -> crate::Result<()> {
        if path.exists() {
            return Err(BurrowError::ConfigExists(path.to_path_buf()));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, DEFAULT_CONFIG)?;
        Ok(())
    }

    pub fn navigator_options(&self) -> NavigatorOptions {
        NavigatorOptions {
            show_hidden: self.display.show_hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = Config::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.open.document_extension, "pdf");
        assert_eq!(config.keys.quit, "\u{3}");
        assert_eq!(config.keys.new_session, "\u{c}");
        assert_eq!(config.keys.ascend, "/");
        assert!(config.display.show_hidden);
        assert_eq!(config.output.result_file, PathBuf::from("/tmp/burrow-lastdir"));
        assert!(config.log.file.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml("[open]\neditor = \"nano\"\n").unwrap();
        assert_eq!(config.open.editor, "nano");
        assert_eq!(config.open.viewer, "zathura");
        assert_eq!(config.keys.ascend, "/");
        assert!(config.display.color);
    }

    #[test]
    fn test_invalid_config() {
        let err = Config::from_toml("[display]\nshow_hidden = \"yes\"\n").unwrap_err();
        assert!(matches!(err, BurrowError::ConfigParse(_)));
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("burrow/config.toml");
        Config::init(&path).unwrap();
        assert!(Config::load(&path).is_ok());
        assert!(matches!(Config::init(&path), Err(BurrowError::ConfigExists(_))));
    }
}
