//! Pairing UI configuration management

use anyhow::{Context, Result, anyhow};
use common::AddressJoin;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::theme::ThemeMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairingConfig {
    #[serde(default)]
    pub ui: UiSettings,
    #[serde(default)]
    pub theme: ThemeSettings,
    #[serde(default)]
    pub pairing: PairingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    pub log_level: String,
    /// Log file path; `~` is expanded. Logs go to stderr when unset.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Event poll interval of the UI loop
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeSettings {
    /// `auto` follows the OS preference, `dark`/`light` pin the theme
    #[serde(default)]
    pub mode: ThemeMode,
    /// How often the OS preference is re-read
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingSettings {
    /// How the IP and port fields are combined
    #[serde(default)]
    pub address_join: AddressJoin,
    /// Reject malformed fields instead of submitting them
    #[serde(default = "default_validate")]
    pub validate: bool,
    /// Prefill for the port field
    #[serde(default)]
    pub default_port: String,
}

fn default_tick_rate_ms() -> u64 {
    100
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_validate() -> bool {
    true
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Auto,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self {
            address_join: AddressJoin::Separator,
            validate: default_validate(),
            default_port: String::new(),
        }
    }
}

impl UiSettings {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Log file path with `~` expanded
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
    }
}

impl ThemeSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl PairingConfig {
    /// Load configuration from the specified path
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).as_ref())
        } else {
            // Try standard locations in order
            let candidates = vec![
                Self::default_path(),
                PathBuf::from("/etc/adb-pair/config.toml"),
            ];

            candidates
                .into_iter()
                .find(|p| p.exists())
                .ok_or_else(|| anyhow!("No configuration file found, using defaults"))?
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: PairingConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config.validate()?;

        tracing::info!("Loaded configuration from: {}", config_path.display());
        tracing::debug!(
            "Config: theme={:?}, address_join={:?}, validate={}",
            config.theme.mode,
            config.pairing.address_join,
            config.pairing.validate
        );
        Ok(config)
    }

    /// Load configuration or return defaults if not found
    pub fn load_or_default() -> Self {
        match Self::load(None) {
            Ok(config) => config,
            Err(e) => {
                // Logging is not initialized yet
                eprintln!("Config: {}", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the specified path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("adb-pair").join("config.toml")
        } else {
            PathBuf::from(".config/adb-pair/config.toml")
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.ui.log_level.as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}', must be one of: {}",
                self.ui.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.ui.tick_rate_ms == 0 {
            return Err(anyhow!("ui.tick_rate_ms must be greater than zero"));
        }

        if self.theme.poll_interval_ms == 0 {
            return Err(anyhow!("theme.poll_interval_ms must be greater than zero"));
        }

        let port = &self.pairing.default_port;
        if !port.is_empty() {
            common::address::validate_port(port)
                .map_err(|e| anyhow!("Invalid pairing.default_port: {}", e))?;
        }

        Ok(())
    }
}
