//! Flat preferences store: dotted keys mapped to JSON scalars/arrays.
//!
//! Loaded over built-in defaults at startup and written back wholesale on
//! every user-visible change.  A missing or malformed file is never fatal.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

pub mod keys {
    pub const ALARM_ENABLED: &str = "alarm.enabled";
    pub const ALARM_TIME: &str = "alarm.time";
    pub const ALARM_CHANNEL: &str = "alarm.channel";
    pub const ALARM_VOLUME: &str = "alarm.volume";
    pub const ALARM_RING_DURATION: &str = "alarm.ring_duration";
    pub const ALARM_SNOOZE_DURATION: &str = "alarm.snooze_duration";
    pub const ALARM_MAX_SNOOZES: &str = "alarm.max_snoozes";
    pub const RADIO_VOLUME: &str = "radio.volume";
    pub const RADIO_SOFTVOL_GAIN: &str = "radio.softvol_gain";
    pub const VOLUME_MIN: &str = "volume.min";
    pub const VOLUME_MAX: &str = "volume.max";
    pub const VOLUME_STEP: &str = "volume.step";
    pub const UI_CURRENT_CHANNEL: &str = "ui.current_channel";
}

// ── AlarmTime ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlarmTimeError {
    #[error("hour {0} out of range 0-23")]
    Hour(u8),
    #[error("minute {0} out of range 0-59")]
    Minute(u8),
}

/// Time of day the alarm rings.  Stored as an `[hour, minute]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "[u8; 2]", into = "[u8; 2]")]
pub struct AlarmTime {
    hour: u8,
    minute: u8,
}

impl AlarmTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, AlarmTimeError> {
        if hour > 23 {
            return Err(AlarmTimeError::Hour(hour));
        }
        if minute > 59 {
            return Err(AlarmTimeError::Minute(minute));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn to_naive_time(self) -> chrono::NaiveTime {
        chrono::NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or_default()
    }
}

impl TryFrom<[u8; 2]> for AlarmTime {
    type Error = AlarmTimeError;

    fn try_from([hour, minute]: [u8; 2]) -> Result<Self, Self::Error> {
        Self::new(hour, minute)
    }
}

impl From<AlarmTime> for [u8; 2] {
    fn from(t: AlarmTime) -> Self {
        [t.hour, t.minute]
    }
}

impl fmt::Display for AlarmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

// ── Preferences ───────────────────────────────────────────────────────────────

pub fn default_values() -> BTreeMap<String, Value> {
    let mut m = BTreeMap::new();
    m.insert(keys::ALARM_ENABLED.into(), json!(false));
    m.insert(keys::ALARM_TIME.into(), json!([0, 0]));
    m.insert(keys::ALARM_CHANNEL.into(), Value::Null);
    m.insert(keys::ALARM_VOLUME.into(), json!(40));
    m.insert(keys::ALARM_RING_DURATION.into(), json!(1800));
    m.insert(keys::ALARM_SNOOZE_DURATION.into(), json!(600));
    m.insert(keys::ALARM_MAX_SNOOZES.into(), json!(3));
    m.insert(keys::RADIO_VOLUME.into(), json!(40));
    m.insert(keys::RADIO_SOFTVOL_GAIN.into(), json!(400));
    m.insert(keys::VOLUME_MIN.into(), json!(0));
    m.insert(keys::VOLUME_MAX.into(), json!(100));
    m.insert(keys::VOLUME_STEP.into(), json!(5));
    m.insert(keys::UI_CURRENT_CHANNEL.into(), Value::Null);
    m
}

#[derive(Debug, Clone)]
pub struct Preferences {
    values: BTreeMap<String, Value>,
    path: Option<PathBuf>,
}

impl Preferences {
    /// Defaults only, not backed by a file.
    pub fn in_memory() -> Self {
        Self {
            values: default_values(),
            path: None,
        }
    }

    /// Defaults overlaid with whatever the file at `path` holds.
    pub fn load(path: &Path) -> Self {
        let mut values = default_values();
        values.extend(read_file(path));
        Self {
            values,
            path: Some(path.to_path_buf()),
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        info!("saving preferences to {:?}", path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Serialize) {
        match serde_json::to_value(value) {
            Ok(v) => {
                self.values.insert(key.to_string(), v);
            }
            Err(e) => warn!("could not store preference {}: {}", key, e),
        }
    }

    /// Typed read.  A missing or ill-typed value falls back to the built-in
    /// default for `key`, then to `T::default()`.
    pub fn typed<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        if let Some(v) = self.values.get(key) {
            match serde_json::from_value::<T>(v.clone()) {
                Ok(t) => return t,
                Err(e) => warn!("invalid preference {} = {}: {}, using default", key, v, e),
            }
        }
        default_values()
            .remove(key)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    pub fn bool(&self, key: &str) -> bool {
        self.typed(key)
    }

    pub fn int(&self, key: &str) -> i64 {
        self.typed(key)
    }

    /// Integer read limited to `range`.  Values outside it fall back to the
    /// built-in default for `key`.
    pub fn int_within(&self, key: &str, range: RangeInclusive<i64>) -> i64 {
        let value = self.int(key);
        if range.contains(&value) {
            return value;
        }
        warn!("preference {} = {} outside {:?}, using default", key, value, range);
        Self::in_memory().int(key)
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.typed(key)
    }

    pub fn alarm_time(&self, key: &str) -> AlarmTime {
        self.typed(key)
    }
}

fn read_file(path: &Path) -> BTreeMap<String, Value> {
    info!("loading preferences from {:?}", path);
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("could not load preferences from file: {}", e);
            return BTreeMap::new();
        }
    };
    match serde_json::from_str(&content) {
        Ok(values) => values,
        Err(e) => {
            warn!("could not parse preferences from file: {}", e);
            BTreeMap::new()
        }
    }
}
