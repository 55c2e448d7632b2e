//! Test doubles for the player and host seams.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;

use clockradio_proto::channels::ChannelRegistry;
use clockradio_proto::config::UiConfig;
use clockradio_proto::host::{BatteryStatus, Host};
use clockradio_proto::prefs::{keys, AlarmTime, Preferences};
use clockradio_proto::protocol::PlayerCommand;

use crate::action::ScreenId;
use crate::alarm::AlarmScheduler;
use crate::context::AppContext;
use crate::playback::Playback;
use crate::player::{Launcher, PlayerProcess};
use crate::screen::Screen;

pub fn registry() -> ChannelRegistry {
    ChannelRegistry::parse(
        "Jazz|http://jazz.test/live\nRock|http://rock.test/live\nNews|http://news.test/live\n",
    )
}

#[derive(Default)]
struct LauncherLog {
    launches: Vec<(i64, i64)>,
    lines: Vec<String>,
    terminated: usize,
    dead: bool,
}

/// Launcher whose processes record every command line.
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    log: Rc<RefCell<LauncherLog>>,
}

impl RecordingLauncher {
    pub fn launches(&self) -> Vec<(i64, i64)> {
        self.log.borrow().launches.clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.log.borrow().lines.clone()
    }

    pub fn terminated(&self) -> usize {
        self.log.borrow().terminated
    }

    /// Make every launched process report itself dead.
    pub fn kill_all(&self) {
        self.log.borrow_mut().dead = true;
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, softvol_gain: i64, volume: i64) -> anyhow::Result<Box<dyn PlayerProcess>> {
        let mut log = self.log.borrow_mut();
        log.launches.push((softvol_gain, volume));
        log.dead = false;
        Ok(Box::new(RecordingProcess {
            log: self.log.clone(),
        }))
    }
}

struct RecordingProcess {
    log: Rc<RefCell<LauncherLog>>,
}

impl PlayerProcess for RecordingProcess {
    fn send(&mut self, command: PlayerCommand) -> anyhow::Result<()> {
        self.log.borrow_mut().lines.push(command.to_string());
        Ok(())
    }

    fn terminate(&mut self) {
        self.log.borrow_mut().terminated += 1;
    }

    fn is_alive(&mut self) -> bool {
        !self.log.borrow().dead
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    WakeAfter(i64),
    CancelWake,
    Poweroff,
}

/// Host that records calls and reports a fixed battery.
#[derive(Default)]
pub struct RecordingHost {
    pub calls: RefCell<Vec<HostCall>>,
    pub charge: Option<u8>,
    pub status: BatteryStatus,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn last_call(&self) -> Option<HostCall> {
        self.calls.borrow().last().cloned()
    }
}

impl Host for RecordingHost {
    fn battery_charge(&self) -> Option<u8> {
        self.charge
    }

    fn battery_status(&self) -> BatteryStatus {
        self.status
    }

    fn set_wake_after(&self, seconds: i64) {
        self.calls.borrow_mut().push(HostCall::WakeAfter(seconds.max(1)));
    }

    fn cancel_wake(&self) {
        self.calls.borrow_mut().push(HostCall::CancelWake);
    }

    fn poweroff(&self) {
        self.calls.borrow_mut().push(HostCall::Poweroff);
    }
}

/// Convenience for tests that need the host both typed and as a trait object.
pub fn host() -> (Rc<RecordingHost>, Rc<dyn Host>) {
    let typed = Rc::new(RecordingHost {
        charge: Some(80),
        status: BatteryStatus::Charging,
        ..Default::default()
    });
    let dynamic: Rc<dyn Host> = typed.clone();
    (typed, dynamic)
}

// ── Screen harness ────────────────────────────────────────────────────────────

pub fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 10)
        .and_then(|d| d.and_hms_opt(h, m, s))
        .unwrap()
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Context over the three-channel registry with an enabled 07:00 alarm on
/// "Rock", backed by recording doubles.
pub struct Harness {
    pub ctx: AppContext,
    pub launcher: RecordingLauncher,
    pub host: Rc<RecordingHost>,
}

pub fn harness(now: NaiveDateTime) -> Harness {
    let mut prefs = Preferences::in_memory();
    prefs.set(keys::ALARM_ENABLED, true);
    prefs.set(keys::ALARM_TIME, AlarmTime::new(7, 0).unwrap());
    prefs.set(keys::ALARM_CHANNEL, "Rock");
    prefs.set(keys::ALARM_MAX_SNOOZES, 1);
    let launcher = RecordingLauncher::default();
    let (typed, dynamic) = host();
    let playback = Playback::new(registry(), Box::new(launcher.clone()), 400);
    let alarm = AlarmScheduler::from_prefs(&prefs, playback, dynamic.clone(), now);
    let ctx = AppContext::new(alarm, prefs, dynamic, UiConfig::default(), now);
    Harness {
        ctx,
        launcher,
        host: typed,
    }
}

/// Feed one key through a screen's claim and update phases.
pub fn press(
    screen: &mut dyn Screen<AppContext>,
    code: KeyCode,
    ctx: &mut AppContext,
    stack: &[ScreenId],
) -> (bool, crate::action::NavAction) {
    screen.clear_input();
    let claimed = screen.handle_input(key(code), ctx);
    let action = screen.update(ctx, stack).unwrap();
    (claimed, action)
}

/// Render one screen into an 80x24 buffer.
pub fn render(screen: &dyn Screen<AppContext>, ctx: &AppContext, stack: &[ScreenId]) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            screen.draw(frame, area, ctx, stack);
        })
        .unwrap();
    terminal.backend().buffer().clone()
}

/// Buffer contents, one string per row.
pub fn rows(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.y..area.y + area.height)
        .map(|y| {
            (area.x..area.x + area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect()
        })
        .collect()
}

pub fn contains_text(buffer: &Buffer, needle: &str) -> bool {
    rows(buffer).iter().any(|row| row.contains(needle))
}
