//! Configuration management for termfolio.
//!
//! Loads configuration from ${TERMFOLIO_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for termfolio configuration and log directories.
    //!
    //! TERMFOLIO_HOME resolution order:
    //! 1. TERMFOLIO_HOME environment variable (if set)
    //! 2. ~/.config/termfolio (default)
    //! 3. ./.termfolio when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the termfolio home directory.
    pub fn termfolio_home() -> PathBuf {
        if let Ok(home) = std::env::var("TERMFOLIO_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".termfolio"),
            |h| h.join(".config").join("termfolio"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        termfolio_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        termfolio_home().join("logs")
    }
}

/// Named color palette used by the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Default,
    Dracula,
    Solarized,
}

impl ThemeName {
    /// Returns all themes for iteration.
    pub fn all() -> &'static [ThemeName] {
        &[ThemeName::Default, ThemeName::Dracula, ThemeName::Solarized]
    }

    /// Returns the config/CLI name for this theme.
    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeName::Default => "default",
            ThemeName::Dracula => "dracula",
            ThemeName::Solarized => "solarized",
        }
    }
}

impl FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ThemeName::all()
            .iter()
            .copied()
            .find(|theme| theme.display_name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = ThemeName::all().iter().map(ThemeName::display_name).collect();
                format!("unknown theme '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prompt printed before echoed commands and the input line
    pub prompt: String,

    /// Milliseconds between revealed characters (0 reveals on the next frame)
    pub typing_interval_ms: u64,

    /// Finish the current reveal instead of rejecting a new submission
    pub interrupt_on_submit: bool,

    /// Color theme
    pub theme: ThemeName,

    /// Optional path to a TOML or JSON portfolio file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_file: Option<String>,

    /// Log filter directive (e.g. "info", "termfolio_core=debug")
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: Self::DEFAULT_PROMPT.to_string(),
            typing_interval_ms: Self::DEFAULT_TYPING_INTERVAL_MS,
            interrupt_on_submit: false,
            theme: ThemeName::default(),
            content_file: None,
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    const DEFAULT_PROMPT: &str = "guest@portfolio:~$";
    const DEFAULT_TYPING_INTERVAL_MS: u64 = 5;
    const DEFAULT_LOG_LEVEL: &str = "info";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Generates a fresh config TOML from Rust defaults.
    pub fn generate() -> Result<String> {
        toml::to_string(&Config::default()).context("Failed to serialize default config to TOML")
    }

    /// Delay between two reveal ticks.
    pub fn typing_interval(&self) -> Duration {
        Duration::from_millis(self.typing_interval_ms)
    }

    /// Content file path with a leading `~/` expanded to the home directory.
    pub fn content_path(&self) -> Option<PathBuf> {
        let raw = self.content_file.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        if let Some(rest) = raw.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return Some(home.join(rest));
        }
        Some(PathBuf::from(raw))
    }
}
