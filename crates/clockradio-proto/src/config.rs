use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub host: HostConfig,
}

/// Where user state and the channel list live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Saved preferences (JSON).  Defaults to `~/.local/share/clockradio/prefs.json`.
    #[serde(default = "default_preferences_file")]
    pub preferences_file: PathBuf,
    /// Channel list, one `name|url[|format]` per line.
    /// Defaults to `~/.config/clockradio/channels`.
    #[serde(default = "default_channels_file")]
    pub channels_file: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlayerConfig {
    /// Explicit path to the player binary.  Searched beside the exe and on PATH when unset.
    #[serde(default)]
    pub binary: Option<PathBuf>,
    /// Extra arguments appended after the slave-mode arguments.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Redraw cadence, independent of the input/update tick.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Sleep between input/update ticks.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_battery_refresh_secs")]
    pub battery_refresh_secs: u64,
    /// Charge percentage at or below which the battery readout is highlighted.
    #[serde(default = "default_battery_low_charge")]
    pub battery_low_charge: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default = "default_battery_status_file")]
    pub battery_status_file: PathBuf,
    #[serde(default = "default_battery_charge_file")]
    pub battery_charge_file: PathBuf,
    /// Command prefix for programming the RTC wake timer.
    #[serde(default = "default_wake_command")]
    pub wake_command: Vec<String>,
    #[serde(default = "default_poweroff_command")]
    pub poweroff_command: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            preferences_file: default_preferences_file(),
            channels_file: default_channels_file(),
            log_file: default_log_file(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            tick_ms: default_tick_ms(),
            battery_refresh_secs: default_battery_refresh_secs(),
            battery_low_charge: default_battery_low_charge(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            battery_status_file: default_battery_status_file(),
            battery_charge_file: default_battery_charge_file(),
            wake_command: default_wake_command(),
            poweroff_command: default_poweroff_command(),
        }
    }
}

fn default_preferences_file() -> PathBuf {
    platform::data_dir().join("prefs.json")
}

fn default_channels_file() -> PathBuf {
    platform::config_dir().join("channels")
}

fn default_log_file() -> PathBuf {
    platform::data_dir().join("clockradio.log")
}

fn default_frame_rate() -> u32 {
    60
}

fn default_tick_ms() -> u64 {
    10
}

fn default_battery_refresh_secs() -> u64 {
    2
}

fn default_battery_low_charge() -> u8 {
    10
}

fn default_battery_status_file() -> PathBuf {
    PathBuf::from("/sys/class/power_supply/BAT0/status")
}

fn default_battery_charge_file() -> PathBuf {
    PathBuf::from("/sys/class/power_supply/BAT0/capacity")
}

fn default_wake_command() -> Vec<String> {
    vec!["sudo".to_string(), "/usr/bin/rtcwake".to_string()]
}

fn default_poweroff_command() -> Vec<String> {
    vec!["sudo".to_string(), "/usr/bin/poweroff".to_string()]
}

impl Config {
    /// Load from the default location, writing a default file on first run.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }

    /// Interval between redraws derived from `ui.frame_rate`.
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.ui.frame_rate.max(1)))
    }
}
