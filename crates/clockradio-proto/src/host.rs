//! Operating system collaborator: battery readout, RTC wake timer, poweroff.
//!
//! Commands are fire-and-forget.  Spawn failures are logged and otherwise
//! ignored; the caller never observes them.

use std::path::Path;
use std::process::Stdio;

use tracing::{debug, info, warn};

use crate::config::HostConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatteryStatus {
    #[default]
    Unknown,
    Charging,
    Discharging,
}

impl BatteryStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Charging" => Self::Charging,
            "Discharging" => Self::Discharging,
            _ => Self::Unknown,
        }
    }
}

/// Host operations the alarm and screens depend on.
pub trait Host {
    /// Charge percentage, `None` when it cannot be read.
    fn battery_charge(&self) -> Option<u8>;

    fn battery_status(&self) -> BatteryStatus;

    /// Schedule a wake event after `seconds`.  Values below 1 are raised to 1,
    /// since a non-positive value means "cancel" at the host level.
    fn set_wake_after(&self, seconds: i64);

    fn cancel_wake(&self);

    fn poweroff(&self);
}

pub struct SystemHost {
    config: HostConfig,
}

impl SystemHost {
    pub fn new(config: HostConfig) -> Self {
        Self { config }
    }

    fn spawn(&self, command: &[String], extra: &[String]) {
        let Some((program, args)) = command.split_first() else {
            warn!("host: empty command, nothing to run");
            return;
        };
        debug!("host: spawning {} {:?} {:?}", program, args, extra);
        let result = tokio::process::Command::new(program)
            .args(args)
            .args(extra)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if let Err(e) = result {
            warn!("host: failed to spawn {}: {}", program, e);
        }
    }
}

fn read_first_line(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    content.lines().next().map(|l| l.trim().to_string())
}

impl Host for SystemHost {
    fn battery_charge(&self) -> Option<u8> {
        let raw = read_first_line(&self.config.battery_charge_file)?;
        let value: f64 = raw.parse().ok()?;
        Some(value.round().clamp(0.0, 100.0) as u8)
    }

    fn battery_status(&self) -> BatteryStatus {
        read_first_line(&self.config.battery_status_file)
            .map(|s| BatteryStatus::parse(&s))
            .unwrap_or_default()
    }

    fn set_wake_after(&self, seconds: i64) {
        let seconds = seconds.max(1);
        info!("host: wake up in {} seconds", seconds);
        self.spawn(
            &self.config.wake_command,
            &["-m".into(), "no".into(), "-s".into(), seconds.to_string()],
        );
    }

    fn cancel_wake(&self) {
        info!("host: wake up time disabled");
        self.spawn(&self.config.wake_command, &["-m".into(), "disable".into()]);
    }

    fn poweroff(&self) {
        info!("host: poweroff requested");
        self.spawn(&self.config.poweroff_command, &[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn host_with(dir: &Path) -> SystemHost {
        SystemHost::new(HostConfig {
            battery_status_file: dir.join("status"),
            battery_charge_file: dir.join("capacity"),
            wake_command: vec![],
            poweroff_command: vec![],
        })
    }

    #[test]
    fn test_battery_status_parse() {
        assert_eq!(BatteryStatus::parse("Charging\n"), BatteryStatus::Charging);
        assert_eq!(BatteryStatus::parse("Discharging"), BatteryStatus::Discharging);
        assert_eq!(BatteryStatus::parse("Full"), BatteryStatus::Unknown);
    }

    #[test]
    fn test_battery_readout_from_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("status"), "Discharging\n").unwrap();
        std::fs::write(dir.path().join("capacity"), "87\n").unwrap();
        let host = host_with(dir.path());
        assert_eq!(host.battery_charge(), Some(87));
        assert_eq!(host.battery_status(), BatteryStatus::Discharging);
    }

    #[test]
    fn test_missing_battery_is_unknown() {
        let host = host_with(&PathBuf::from("/nonexistent/clockradio-test"));
        assert_eq!(host.battery_charge(), None);
        assert_eq!(host.battery_status(), BatteryStatus::Unknown);
    }
}
