//! AppContext — the state screens act on.
//!
//! Screens get `&AppContext` while claiming input and drawing, and
//! `&mut AppContext` only during the update phase.

use std::rc::Rc;

use chrono::NaiveDateTime;
use tracing::error;

use clockradio_proto::config::UiConfig;
use clockradio_proto::host::Host;
use clockradio_proto::prefs::{keys, Preferences};

use crate::alarm::AlarmScheduler;

pub struct AppContext {
    pub alarm: AlarmScheduler,
    pub prefs: Preferences,
    pub host: Rc<dyn Host>,
    pub ui: UiConfig,
    /// Wall-clock time sampled at the start of the tick.
    pub now: NaiveDateTime,
    /// Channel selected in the radio frame.
    pub current_channel: Option<String>,
}

impl AppContext {
    pub fn new(
        alarm: AlarmScheduler,
        prefs: Preferences,
        host: Rc<dyn Host>,
        ui: UiConfig,
        now: NaiveDateTime,
    ) -> Self {
        let channels = alarm.playback().channels();
        let current_channel = prefs
            .string(keys::UI_CURRENT_CHANNEL)
            .filter(|name| channels.contains(name))
            .or_else(|| channels.names().first().cloned());
        Self {
            alarm,
            prefs,
            host,
            ui,
            now,
            current_channel,
        }
    }

    pub fn channel_names(&self) -> &[String] {
        self.alarm.playback().channels().names()
    }

    /// Write every user-visible setting back to the preferences file.
    /// Failures are logged; the session carries on.
    pub fn save_preferences(&mut self) {
        self.alarm.sync_preferences(&mut self.prefs);
        self.prefs.set(keys::UI_CURRENT_CHANNEL, &self.current_channel);
        if let Err(e) = self.prefs.save() {
            error!("could not save preferences: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::Playback;
    use crate::testing::{at, host, registry, RecordingLauncher};
    use clockradio_proto::prefs::AlarmTime;

    fn context(prefs: Preferences) -> AppContext {
        let (_, host) = host();
        let playback = Playback::new(registry(), Box::new(RecordingLauncher::default()), 400);
        let alarm = AlarmScheduler::from_prefs(&prefs, playback, host.clone(), at(12, 0, 0));
        AppContext::new(alarm, prefs, host, UiConfig::default(), at(12, 0, 0))
    }

    #[test]
    fn test_current_channel_falls_back_to_first() {
        let mut prefs = Preferences::in_memory();
        prefs.set(keys::UI_CURRENT_CHANNEL, "Gone");
        assert_eq!(context(prefs).current_channel.as_deref(), Some("Jazz"));

        let mut prefs = Preferences::in_memory();
        prefs.set(keys::UI_CURRENT_CHANNEL, "News");
        assert_eq!(context(prefs).current_channel.as_deref(), Some("News"));
    }

    #[test]
    fn test_save_preferences_writes_every_setting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let mut ctx = context(Preferences::load(&path));
        ctx.current_channel = Some("Rock".into());
        ctx.alarm.set_alarm_time(AlarmTime::new(6, 45).unwrap(), ctx.now);
        ctx.alarm.increase_radio_volume();
        ctx.save_preferences();

        let raw = std::fs::read_to_string(&path).unwrap();
        let saved: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved[keys::UI_CURRENT_CHANNEL], "Rock");
        assert_eq!(saved[keys::ALARM_TIME], serde_json::json!([6, 45]));
        assert_eq!(saved[keys::RADIO_VOLUME], 45);
        assert_eq!(saved[keys::ALARM_CHANNEL], "Jazz");
    }
}
