use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::assets::fonts::FontConfig;
use crate::foundation::error::{PackshotError, PackshotResult};

/// Overrides the download directory.
pub const ENV_DOWNLOAD_DIR: &str = "PACKSHOT_DOWNLOAD_DIR";
/// Overrides the share command (whitespace-separated program and arguments).
pub const ENV_SHARE_COMMAND: &str = "PACKSHOT_SHARE_COMMAND";
/// Adds one extra font directory.
pub const ENV_FONT_DIR: &str = "PACKSHOT_FONT_DIR";

/// Top-level configuration, stored as JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PackshotConfig {
    /// Caption font lookup.
    pub fonts: FontConfig,
    /// Delivery chain targets.
    pub delivery: DeliveryConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// Delivery chain configuration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeliveryConfig {
    /// External program (plus arguments) handed the exported file path as its last argument.
    pub share_command: Option<String>,
    /// Where downloads are written; the user's download directory when unset.
    pub download_dir: Option<PathBuf>,
    /// Try the share target.
    pub share: bool,
    /// Try the clipboard target.
    pub clipboard: bool,
    /// Try the download target.
    pub download: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            share_command: None,
            download_dir: None,
            share: true,
            clipboard: true,
            download: true,
        }
    }
}

impl DeliveryConfig {
    /// Configured download directory, else the platform download dir, else the working directory.
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Logging configuration consumed by [`crate::init_logging`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `info`, `packshot=debug`).
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl PackshotConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> PackshotResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// `<config dir>/packshot/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("packshot").join("config.json"))
    }

    /// Load configuration, then apply environment overrides.
    ///
    /// An explicit `path` must exist and parse. Without one the default location is tried and
    /// an unreadable or invalid file there falls back to defaults with a warning.
    pub fn load(path: Option<&Path>) -> PackshotResult<Self> {
        let mut cfg = match path {
            Some(p) => Self::read_file(p)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => Self::read_file(&p).unwrap_or_else(|e| {
                    tracing::warn!(path = %p.display(), error = %e, "ignoring invalid config");
                    Self::default()
                }),
                None => Self::default(),
            },
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn read_file(path: &Path) -> PackshotResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
            .map_err(|e| PackshotError::serde(format!("config '{}': {e}", path.display())))
    }

    /// Apply `PACKSHOT_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` in place of the process environment.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = non_empty(ENV_DOWNLOAD_DIR) {
            self.delivery.download_dir = Some(PathBuf::from(dir));
        }
        if let Some(cmd) = non_empty(ENV_SHARE_COMMAND) {
            self.delivery.share_command = Some(cmd);
        }
        if let Some(dir) = non_empty(ENV_FONT_DIR) {
            let dir = PathBuf::from(dir);
            if !self.fonts.directories.contains(&dir) {
                self.fonts.directories.push(dir);
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
