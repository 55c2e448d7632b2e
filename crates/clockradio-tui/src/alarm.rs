//! Alarm scheduler — the clock-radio state machine.
//!
//! ```text
//!   Waiting ──(time matches)──▶ ReadyToRing ──(enabled, idle, not suppressed)──▶ Ringing
//!      ▲                            │                                            │   ▲
//!      └────(minute passed)─────────┘                              (snooze)     ▼   │ (snooze over)
//!      ◀──────────────(ring timeout / exit / snoozes exhausted)──────────── Snoozing
//! ```
//!
//! `update` is advanced once per tick with the current wall-clock time and
//! returns at most one `AlarmEvent` for the UI to react to in the same tick.
//! Every transition goes through one table; anything outside it is an error.

use std::fmt;
use std::rc::Rc;

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use tracing::{debug, info, warn};

use clockradio_proto::host::Host;
use clockradio_proto::prefs::{keys, AlarmTime, Preferences};

use crate::playback::{Playback, PlaybackOwner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmPhase {
    Waiting,
    ReadyToRing,
    Ringing,
    Snoozing,
}

impl fmt::Display for AlarmPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Notifications produced by `AlarmScheduler::update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmEvent {
    Fired,
    RingTimeout,
    SnoozeTimeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnoozeOutcome {
    /// Snooze started; the alarm rings again when it runs out.
    Snoozing,
    /// Snooze limit exceeded; the alarm is over.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlarmError {
    #[error("invalid alarm transition: {from} -> {to}")]
    InvalidTransition { from: AlarmPhase, to: AlarmPhase },
    #[error("cannot {request} while {phase}")]
    InvalidRequest {
        request: &'static str,
        phase: AlarmPhase,
    },
}

// ── Settings ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeLimits {
    pub min: i64,
    pub max: i64,
    pub step: i64,
}

impl VolumeLimits {
    pub fn from_prefs(prefs: &Preferences) -> Self {
        Self {
            min: prefs.int(keys::VOLUME_MIN),
            max: prefs.int(keys::VOLUME_MAX),
            step: prefs.int(keys::VOLUME_STEP),
        }
    }

    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min, self.max.max(self.min))
    }

    pub fn raise(&self, value: i64) -> i64 {
        self.clamp(value.saturating_add(self.step))
    }

    pub fn lower(&self, value: i64) -> i64 {
        self.clamp(value.saturating_sub(self.step))
    }

    /// Position of `value` within the range, 0.0..=1.0.
    pub fn fraction(&self, value: i64) -> f64 {
        let span = (self.max - self.min).max(1) as f64;
        ((value - self.min) as f64 / span).clamp(0.0, 1.0)
    }
}

/// Longest ring or snooze period accepted from preferences: one day.
pub const MAX_DURATION_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmSettings {
    pub enabled: bool,
    pub time: AlarmTime,
    pub channel: Option<String>,
    pub volume: i64,
    /// Seconds the alarm rings before giving up on its own.
    pub ring_duration: i64,
    pub snooze_duration: i64,
    pub max_snoozes: u32,
}

impl AlarmSettings {
    pub fn from_prefs(prefs: &Preferences) -> Self {
        Self {
            enabled: prefs.bool(keys::ALARM_ENABLED),
            time: prefs.alarm_time(keys::ALARM_TIME),
            channel: prefs.string(keys::ALARM_CHANNEL),
            volume: prefs.int(keys::ALARM_VOLUME),
            ring_duration: prefs.int_within(keys::ALARM_RING_DURATION, 1..=MAX_DURATION_SECS),
            snooze_duration: prefs.int_within(keys::ALARM_SNOOZE_DURATION, 1..=MAX_DURATION_SECS),
            max_snoozes: prefs.typed(keys::ALARM_MAX_SNOOZES),
        }
    }
}

/// Today if `now` is still before the alarm minute has passed, else tomorrow.
pub fn next_fire_date(time: AlarmTime, now: NaiveDateTime) -> NaiveDate {
    let today = now.date();
    let alarm_end = today.and_time(time.to_naive_time()) + Duration::minutes(1);
    if now < alarm_end {
        today
    } else {
        today.succ_opt().unwrap_or(today)
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

pub struct AlarmScheduler {
    settings: AlarmSettings,
    limits: VolumeLimits,
    radio_volume: i64,

    phase: AlarmPhase,
    fire_date: NaiveDate,
    ringing_started_at: Option<NaiveDateTime>,
    snooze_started_at: Option<NaiveDateTime>,
    snooze_count: u32,
    /// Set by `set_alarm_time`, cleared at the end of every `update`.
    time_edited: bool,

    playback: Playback,
    host: Rc<dyn Host>,
}

impl AlarmScheduler {
    pub fn new(
        mut settings: AlarmSettings,
        limits: VolumeLimits,
        radio_volume: i64,
        playback: Playback,
        host: Rc<dyn Host>,
        now: NaiveDateTime,
    ) -> Self {
        let channels = playback.channels();
        let known = settings
            .channel
            .as_deref()
            .is_some_and(|name| channels.contains(name));
        if !known {
            let fallback = channels.names().first().cloned();
            if let Some(missing) = &settings.channel {
                warn!("alarm channel \"{}\" not found, using {:?}", missing, fallback);
            }
            settings.channel = fallback;
        }
        if settings.channel.is_none() && settings.enabled {
            warn!("no channel available, alarm disabled");
            settings.enabled = false;
        }
        settings.volume = limits.clamp(settings.volume);

        let fire_date = next_fire_date(settings.time, now);
        info!(
            "alarm {} at {} on {}",
            if settings.enabled { "on" } else { "off" },
            settings.time,
            fire_date
        );
        let scheduler = Self {
            settings,
            limits,
            radio_volume: limits.clamp(radio_volume),
            phase: AlarmPhase::Waiting,
            fire_date,
            ringing_started_at: None,
            snooze_started_at: None,
            snooze_count: 0,
            time_edited: false,
            playback,
            host,
        };
        scheduler.reprogram_wake(now);
        scheduler
    }

    pub fn from_prefs(
        prefs: &Preferences,
        playback: Playback,
        host: Rc<dyn Host>,
        now: NaiveDateTime,
    ) -> Self {
        Self::new(
            AlarmSettings::from_prefs(prefs),
            VolumeLimits::from_prefs(prefs),
            prefs.int(keys::RADIO_VOLUME),
            playback,
            host,
            now,
        )
    }

    pub fn sync_preferences(&self, prefs: &mut Preferences) {
        prefs.set(keys::ALARM_ENABLED, self.settings.enabled);
        prefs.set(keys::ALARM_TIME, self.settings.time);
        prefs.set(keys::ALARM_CHANNEL, &self.settings.channel);
        prefs.set(keys::ALARM_VOLUME, self.settings.volume);
        prefs.set(keys::RADIO_VOLUME, self.radio_volume);
    }

    // ── State machine ─────────────────────────────────────────────────────────

    /// Advance one tick.  `suppress` keeps a due alarm in `ReadyToRing`
    /// without starting playback.
    pub fn update(
        &mut self,
        now: NaiveDateTime,
        suppress: bool,
    ) -> Result<Option<AlarmEvent>, AlarmError> {
        let event = match self.phase {
            AlarmPhase::Waiting => {
                if self.is_ready_to_ring(now) {
                    self.transition(AlarmPhase::ReadyToRing, now)?;
                }
                None
            }
            AlarmPhase::ReadyToRing => {
                if !self.is_ready_to_ring(now) {
                    self.transition(AlarmPhase::Waiting, now)?;
                    None
                } else if self.settings.enabled && !self.playback.is_playing() && !suppress {
                    debug!("firing alarm!");
                    self.start_alarm_playback();
                    self.transition(AlarmPhase::Ringing, now)?;
                    Some(AlarmEvent::Fired)
                } else {
                    None
                }
            }
            AlarmPhase::Ringing => {
                if self.ring_countdown(now) <= Duration::zero() {
                    self.playback.stop();
                    self.transition(AlarmPhase::Waiting, now)?;
                    Some(AlarmEvent::RingTimeout)
                } else {
                    None
                }
            }
            AlarmPhase::Snoozing => {
                if self.snooze_countdown(now) <= Duration::zero() {
                    self.start_alarm_playback();
                    self.transition(AlarmPhase::Ringing, now)?;
                    Some(AlarmEvent::SnoozeTimeout)
                } else {
                    None
                }
            }
        };
        self.time_edited = false;
        Ok(event)
    }

    fn transition(&mut self, to: AlarmPhase, now: NaiveDateTime) -> Result<(), AlarmError> {
        use AlarmPhase::*;
        let from = self.phase;
        match (from, to) {
            (Waiting, ReadyToRing) => {}
            (ReadyToRing, Waiting) => {
                self.advance_fire_date(now);
                self.reprogram_wake(now);
            }
            (ReadyToRing, Ringing) => {
                self.advance_fire_date(now);
                self.reprogram_wake(now);
                self.ringing_started_at = Some(now);
                self.snooze_started_at = None;
            }
            (Ringing, Waiting) | (Snoozing, Waiting) => {
                self.ringing_started_at = None;
                self.snooze_started_at = None;
                self.snooze_count = 0;
            }
            (Ringing, Snoozing) => {
                self.snooze_started_at = Some(now);
                self.ringing_started_at = None;
            }
            (Snoozing, Ringing) => {
                self.ringing_started_at = Some(now);
                self.snooze_started_at = None;
            }
            _ => return Err(AlarmError::InvalidTransition { from, to }),
        }
        info!("alarm: {} -> {}", from, to);
        self.phase = to;
        Ok(())
    }

    fn is_ready_to_ring(&self, now: NaiveDateTime) -> bool {
        now.date() == self.fire_date
            && now.hour() == u32::from(self.settings.time.hour())
            && now.minute() == u32::from(self.settings.time.minute())
    }

    /// Move the fire date to tomorrow unless the time was just edited.
    fn advance_fire_date(&mut self, now: NaiveDateTime) {
        if self.time_edited {
            return;
        }
        let today = now.date();
        self.fire_date = today.succ_opt().unwrap_or(today);
        debug!("next alarm date {}", self.fire_date);
    }

    fn reprogram_wake(&self, now: NaiveDateTime) {
        if self.settings.enabled {
            let at = self.fire_date.and_time(self.settings.time.to_naive_time());
            info!("wake up time set to: {}", at);
            let seconds = ((at - now).num_milliseconds() as f64 / 1000.0).round() as i64;
            self.host.set_wake_after(seconds.max(1));
        } else {
            self.host.cancel_wake();
        }
    }

    fn start_alarm_playback(&mut self) {
        match self.settings.channel.clone() {
            Some(channel) => {
                self.playback
                    .play(&channel, self.settings.volume, PlaybackOwner::Alarm)
            }
            None => warn!("alarm has no channel, ringing silently"),
        }
    }

    // ── Ringing / snoozing requests ───────────────────────────────────────────

    pub fn snooze(&mut self, now: NaiveDateTime) -> Result<SnoozeOutcome, AlarmError> {
        if self.phase != AlarmPhase::Ringing {
            return Err(AlarmError::InvalidRequest {
                request: "snooze",
                phase: self.phase,
            });
        }
        self.playback.stop();
        self.snooze_count += 1;
        if self.snooze_count <= self.settings.max_snoozes {
            info!("snooze {}/{}", self.snooze_count, self.settings.max_snoozes);
            self.transition(AlarmPhase::Snoozing, now)?;
            Ok(SnoozeOutcome::Snoozing)
        } else {
            info!("snooze limit reached, alarm over");
            self.snooze_count = 0;
            self.exit_alarm(now)?;
            Ok(SnoozeOutcome::Exhausted)
        }
    }

    /// Leave the alarm.  Whatever is playing keeps playing as manual listening.
    pub fn exit_alarm(&mut self, now: NaiveDateTime) -> Result<(), AlarmError> {
        match self.phase {
            AlarmPhase::Ringing | AlarmPhase::Snoozing => {
                self.transition(AlarmPhase::Waiting, now)?;
                self.playback.adopt(PlaybackOwner::Manual);
                Ok(())
            }
            phase => Err(AlarmError::InvalidRequest {
                request: "exit alarm",
                phase,
            }),
        }
    }

    pub fn ring_countdown(&self, now: NaiveDateTime) -> Duration {
        match (self.phase, self.ringing_started_at) {
            (AlarmPhase::Ringing, Some(start)) => {
                Duration::seconds(self.settings.ring_duration) - (now - start)
            }
            _ => Duration::zero(),
        }
    }

    pub fn snooze_countdown(&self, now: NaiveDateTime) -> Duration {
        match (self.phase, self.snooze_started_at) {
            (AlarmPhase::Snoozing, Some(start)) => {
                Duration::seconds(self.settings.snooze_duration) - (now - start)
            }
            _ => Duration::zero(),
        }
    }

    pub fn next_snooze_quits(&self) -> bool {
        self.snooze_count == self.settings.max_snoozes
    }

    // ── Alarm settings ────────────────────────────────────────────────────────

    pub fn set_alarm_time(&mut self, time: AlarmTime, now: NaiveDateTime) {
        self.settings.time = time;
        info!("alarm time is {}", time);
        self.fire_date = next_fire_date(time, now);
        self.time_edited = true;
        self.reprogram_wake(now);
    }

    pub fn set_enabled(&mut self, enabled: bool, now: NaiveDateTime) {
        let enabled = if enabled && self.settings.channel.is_none() {
            warn!("cannot enable alarm without a channel");
            false
        } else {
            enabled
        };
        self.settings.enabled = enabled;
        info!("set alarm: {}", if enabled { "on" } else { "off" });
        self.reprogram_wake(now);
    }

    pub fn toggle(&mut self, now: NaiveDateTime) {
        self.set_enabled(!self.settings.enabled, now);
    }

    pub fn set_alarm_channel(&mut self, name: &str) {
        if !self.playback.channels().contains(name) {
            warn!("ignoring unknown alarm channel \"{}\"", name);
            return;
        }
        info!("alarm channel is {}", name);
        self.settings.channel = Some(name.to_string());
    }

    pub fn increase_alarm_volume(&mut self) {
        self.settings.volume = self.limits.raise(self.settings.volume);
        info!("changed alarm volume to {}", self.settings.volume);
        self.propagate_volume(self.settings.volume, PlaybackOwner::Alarm);
    }

    pub fn decrease_alarm_volume(&mut self) {
        self.settings.volume = self.limits.lower(self.settings.volume);
        info!("changed alarm volume to {}", self.settings.volume);
        self.propagate_volume(self.settings.volume, PlaybackOwner::Alarm);
    }

    // ── Manual listening ──────────────────────────────────────────────────────

    /// Start manual playback.  A ringing or snoozing alarm is ended first.
    pub fn play_radio(&mut self, name: &str, now: NaiveDateTime) -> Result<(), AlarmError> {
        if matches!(self.phase, AlarmPhase::Ringing | AlarmPhase::Snoozing) {
            info!("manual playback ends the alarm");
            self.transition(AlarmPhase::Waiting, now)?;
        }
        self.playback
            .play(name, self.radio_volume, PlaybackOwner::Manual);
        Ok(())
    }

    pub fn stop_radio(&mut self) {
        if self.playback.is_playing() {
            self.playback.stop();
        }
    }

    pub fn pause_radio(&mut self) {
        self.playback.pause();
    }

    pub fn increase_radio_volume(&mut self) {
        self.radio_volume = self.limits.raise(self.radio_volume);
        info!("changed volume to {}", self.radio_volume);
        self.propagate_volume(self.radio_volume, PlaybackOwner::Manual);
    }

    pub fn decrease_radio_volume(&mut self) {
        self.radio_volume = self.limits.lower(self.radio_volume);
        info!("changed volume to {}", self.radio_volume);
        self.propagate_volume(self.radio_volume, PlaybackOwner::Manual);
    }

    /// Forward `value` only to a session of the matching owner.
    fn propagate_volume(&mut self, value: i64, owner: PlaybackOwner) {
        if self.playback.owner() == Some(owner) {
            self.playback.set_volume(value, true);
        }
    }

    /// Drop a dead player session.
    pub fn reap_player(&mut self) {
        self.playback.reap();
    }

    pub fn shutdown(&mut self) {
        self.playback.stop();
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn phase(&self) -> AlarmPhase {
        self.phase
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn alarm_time(&self) -> AlarmTime {
        self.settings.time
    }

    pub fn alarm_channel(&self) -> Option<&str> {
        self.settings.channel.as_deref()
    }

    pub fn alarm_volume(&self) -> i64 {
        self.settings.volume
    }

    pub fn radio_volume(&self) -> i64 {
        self.radio_volume
    }

    pub fn limits(&self) -> VolumeLimits {
        self.limits
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }
}

#[cfg(test)]
impl AlarmScheduler {
    pub fn fire_date(&self) -> NaiveDate {
        self.fire_date
    }

    pub fn snooze_count(&self) -> u32 {
        self.snooze_count
    }
}
