use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::entities::monitoring::MonitoringConfig;
use crate::domain::entities::notification::NotificationTarget;
use crate::domain::value_objects::DiffStrategy;

/// Top-level application configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub monitoring: MonitoringSection,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Check scheduling and change-detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSection {
    #[serde(default = "default_interval_min")]
    pub interval_min_secs: u64,
    #[serde(default = "default_interval_max")]
    pub interval_max_secs: u64,
    #[serde(default = "default_true")]
    pub auto_refresh: bool,
    #[serde(default = "default_settle_delay")]
    pub refresh_settle_delay_ms: u64,
    #[serde(default = "default_change_threshold")]
    pub change_threshold: f64,
    #[serde(default)]
    pub strategy: DiffStrategy,
}

/// The watched page and the headless browser driving captures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_browser_bin")]
    pub browser_bin: String,
    #[serde(default = "default_capture_timeout")]
    pub capture_timeout_secs: u64,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
}

/// Bootstrap Telegram credentials; the persisted settings row wins once the
/// operator has saved one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
}

/// Secondary notification channel toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub desktop: bool,
}

/// Text recognition settings for the keyword strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_ocr_bin")]
    pub bin: String,
    #[serde(default = "default_ocr_lang")]
    pub lang: String,
    #[serde(default = "default_ocr_timeout")]
    pub timeout_secs: u64,
}

/// Database storage path (tilde-expanded at point of use).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

// --- Defaults ---

const fn default_interval_min() -> u64 {
    40
}

const fn default_interval_max() -> u64 {
    125
}

const fn default_settle_delay() -> u64 {
    2000
}

const fn default_change_threshold() -> f64 {
    5.0
}

const fn default_true() -> bool {
    true
}

fn default_browser_bin() -> String {
    "chromium".into()
}

const fn default_capture_timeout() -> u64 {
    30
}

const fn default_window_width() -> u32 {
    1280
}

const fn default_window_height() -> u32 {
    1024
}

fn default_ocr_bin() -> String {
    "tesseract".into()
}

fn default_ocr_lang() -> String {
    "eng".into()
}

const fn default_ocr_timeout() -> u64 {
    20
}

// NOTE: Stored as raw string with tilde — expand with shellexpand at point of use.
fn default_database_path() -> String {
    "~/.local/share/guet/guet.db".into()
}

// --- Default impls ---

impl Default for MonitoringSection {
    fn default() -> Self {
        Self {
            interval_min_secs: default_interval_min(),
            interval_max_secs: default_interval_max(),
            auto_refresh: default_true(),
            refresh_settle_delay_ms: default_settle_delay(),
            change_threshold: default_change_threshold(),
            strategy: DiffStrategy::default(),
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            browser_bin: default_browser_bin(),
            capture_timeout_secs: default_capture_timeout(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            desktop: default_true(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            bin: default_ocr_bin(),
            lang: default_ocr_lang(),
            timeout_secs: default_ocr_timeout(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load config from default path or create default config file
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined,
    /// the file cannot be read, or the TOML content is invalid.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_or_create(&path)
    }

    /// Load from a specific path, or create a default config file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is invalid,
    /// or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to a specific path, creating parent directories if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("guet").join("config.toml"))
    }

    /// Bootstrap Telegram credentials from the config file.
    #[must_use]
    pub fn notification_target(&self) -> NotificationTarget {
        NotificationTarget::new(self.telegram.bot_token.clone(), self.telegram.chat_id.clone())
    }
}

impl From<&MonitoringSection> for MonitoringConfig {
    fn from(section: &MonitoringSection) -> Self {
        Self {
            is_active: false,
            interval_min_secs: section.interval_min_secs,
            interval_max_secs: section.interval_max_secs,
            auto_refresh: section.auto_refresh,
            refresh_settle_delay_ms: section.refresh_settle_delay_ms,
            last_check_at: None,
        }
        .sanitized()
    }
}
