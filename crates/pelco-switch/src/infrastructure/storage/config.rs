//! TOML-based configuration for the switch.
//!
//! The default location is the platform config directory:
//! - Windows:  `%APPDATA%\PelcoSwitch\config.toml`
//! - Linux:    `~/.config/pelcoswitch/config.toml`
//! - macOS:    `~/Library/Application Support/PelcoSwitch/config.toml`
//!
//! `--config <PATH>` on the command line points somewhere else.
//!
//! Example:
//!
//! ```toml
//! [switch]
//! log_level = "info"
//! default_target = "cam1"
//! default_mode = "preview"
//! camera_address = 1
//!
//! [serial]
//! baud_rate = 2400
//! joystick = "/dev/ttyUSB0"
//!
//! [http]
//! bind_address = "0.0.0.0:5000"
//!
//! [[cameras]]
//! name = "cam1"
//! port = "/dev/ttyUSB1"
//!
//! [[cameras]]
//! name = "cam2"
//! port = "/dev/ttyUSB2"
//! ```
//!
//! Every field has a `#[serde(default = ...)]`, so a partial file only
//! overrides what it names.  A missing `[[cameras]]` list keeps the default
//! two-camera setup.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::manage_targets::{Mode, BROADCAST_TARGET};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The file parsed but describes an unusable setup.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub switch: SwitchConfig,
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default = "default_cameras")]
    pub cameras: Vec<CameraEntry>,
}

/// Routing defaults and logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwitchConfig {
    /// `tracing` log level, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Camera selected at startup.
    #[serde(default = "default_target")]
    pub default_target: String,
    #[serde(default)]
    pub default_mode: Mode,
    /// Pelco-D address written into synthesized preset frames.
    #[serde(default = "default_camera_address")]
    pub camera_address: u8,
}

/// Serial line settings shared by the joystick and all cameras.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerialConfig {
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Device path of the joystick input.
    #[serde(default = "default_joystick_port")]
    pub joystick: String,
}

/// Control-plane listener.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpConfig {
    /// `host:port` for the HTTP control surface.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

/// One routable camera.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraEntry {
    /// Target name used by the control plane.
    pub name: String,
    /// Serial device path.
    pub port: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_target() -> String {
    "cam1".to_string()
}
fn default_camera_address() -> u8 {
    1
}
fn default_baud_rate() -> u32 {
    2400
}
fn default_joystick_port() -> String {
    "/dev/ttyUSB0".to_string()
}
fn default_bind_address() -> String {
    "0.0.0.0:5000".to_string()
}
fn default_cameras() -> Vec<CameraEntry> {
    vec![
        CameraEntry {
            name: "cam1".to_string(),
            port: "/dev/ttyUSB1".to_string(),
        },
        CameraEntry {
            name: "cam2".to_string(),
            port: "/dev/ttyUSB2".to_string(),
        },
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            switch: SwitchConfig::default(),
            serial: SerialConfig::default(),
            http: HttpConfig::default(),
            cameras: default_cameras(),
        }
    }
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_target: default_target(),
            default_mode: Mode::default(),
            camera_address: default_camera_address(),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: default_baud_rate(),
            joystick: default_joystick_port(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

impl AppConfig {
    /// Checks that the camera list can back a route table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the list is empty, a name is
    /// repeated, a camera uses the reserved broadcast name, or
    /// `switch.default_target` is not one of the cameras.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cameras.is_empty() {
            return Err(ConfigError::Invalid("no cameras configured".to_string()));
        }

        let mut seen = HashSet::new();
        for camera in &self.cameras {
            if camera.name == BROADCAST_TARGET {
                return Err(ConfigError::Invalid(format!(
                    "camera name '{BROADCAST_TARGET}' is reserved"
                )));
            }
            if !seen.insert(camera.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate camera name '{}'",
                    camera.name
                )));
            }
        }

        if !seen.contains(self.switch.default_target.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "default_target '{}' is not a configured camera",
                self.switch.default_target
            )));
        }
        Ok(())
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the default config file path.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads and validates `AppConfig` from `path`, returning
/// `AppConfig::default()` if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed, and
/// [`ConfigError::Invalid`] if validation fails.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let cfg = match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
        Err(e) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Parses TOML text without touching the file system.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("PelcoSwitch"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("pelcoswitch"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("PelcoSwitch")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
