//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.plif/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::state::DEFAULT_GREETING;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PlifConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub picker: PickerConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub model: Option<String>,
    pub greeting: Option<String>,
    pub clear_image_after_send: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CameraConfig {
    pub enabled: Option<bool>,
    pub device: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PickerConfig {
    pub camera_command: Option<String>,
    pub gallery_command: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";
/// `{output}` is replaced with the path the capture must be written to.
pub const DEFAULT_CAMERA_COMMAND: &str = "fswebcam --no-banner -r 1280x720 {output}";
/// Must print the chosen file path on stdout; empty output means cancelled.
pub const DEFAULT_GALLERY_COMMAND: &str = "zenity --file-selection --title='Select an image'";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub model_name: String,
    pub greeting: String,
    pub clear_image_after_send: bool,
    /// Empty when unset; the API rejects the request and the error is shown.
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub camera_enabled: bool,
    pub camera_device: PathBuf,
    pub camera_command: String,
    pub gallery_command: String,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default)]
pub struct CliOverrides<'a> {
    pub model: Option<&'a str>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.plif/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".plif").join("config.toml"))
}

/// Load config from `~/.plif/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `PlifConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<PlifConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(PlifConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<PlifConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(PlifConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: PlifConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Plif Configuration
# All settings are optional. Defaults are used for anything not set.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# model = "gemini-1.5-flash"         # Or set PLIF_MODEL env var
# greeting = "Hello, I am Plif."
# clear_image_after_send = false     # Keep the attached image for follow-up prompts

# [gemini]
# api_key = "AIza..."                # Or set GEMINI_API_KEY env var
# base_url = "https://generativelanguage.googleapis.com/v1beta"

# [camera]
# enabled = true
# device = "/dev/video0"

# [picker]
# camera_command = "fswebcam --no-banner -r 1280x720 {output}"
# gallery_command = "zenity --file-selection --title='Select an image'"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &PlifConfig, cli: &CliOverrides<'_>) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// `resolve` with the environment lookup supplied by the caller.
pub fn resolve_with_env(
    config: &PlifConfig,
    cli: &CliOverrides<'_>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Model: CLI → env → config → default
    let model_name = cli
        .model
        .map(|s| s.to_string())
        .or_else(|| env("PLIF_MODEL"))
        .or_else(|| config.general.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    // API key: env → config → empty
    let gemini_api_key = env("GEMINI_API_KEY")
        .or_else(|| config.gemini.api_key.clone())
        .unwrap_or_default();

    // Base URL: env → config → default
    let gemini_base_url = env("GEMINI_BASE_URL")
        .or_else(|| config.gemini.base_url.clone())
        .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

    if gemini_api_key.is_empty() {
        warn!("No Gemini API key configured; requests will be rejected by the API");
    }

    ResolvedConfig {
        model_name,
        greeting: config
            .general
            .greeting
            .clone()
            .unwrap_or_else(|| DEFAULT_GREETING.to_string()),
        clear_image_after_send: config.general.clear_image_after_send.unwrap_or(false),
        gemini_api_key,
        gemini_base_url,
        camera_enabled: config.camera.enabled.unwrap_or(true),
        camera_device: PathBuf::from(
            config
                .camera
                .device
                .as_deref()
                .unwrap_or(DEFAULT_CAMERA_DEVICE),
        ),
        camera_command: config
            .picker
            .camera_command
            .clone()
            .unwrap_or_else(|| DEFAULT_CAMERA_COMMAND.to_string()),
        gallery_command: config
            .picker
            .gallery_command
            .clone()
            .unwrap_or_else(|| DEFAULT_GALLERY_COMMAND.to_string()),
    }
}
