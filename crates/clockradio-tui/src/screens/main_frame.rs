//! MainFrame — bottom layer: tab bar, clock and battery.  Owns the global
//! keys (exit dialog, tab switching) and reacts to a firing alarm.

use chrono::{Duration, NaiveDateTime};
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};
use tracing::debug;

use clockradio_proto::host::BatteryStatus;

use crate::action::{NavAction, ScreenId};
use crate::alarm::AlarmEvent;
use crate::context::AppContext;
use crate::keys::{self, pressed};
use crate::screen::Screen;
use crate::widgets::pane_chrome::pane_chrome;
use crate::widgets::status_bar::{battery_spans, draw_clock_bar, draw_tab_bar};

/// Upper bound on the configured battery refresh interval: one hour.
const MAX_BATTERY_REFRESH_SECS: u64 = 60 * 60;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct BatteryReading {
    charge: Option<u8>,
    status: BatteryStatus,
}

#[derive(Default)]
pub struct MainFrame {
    pending: Option<KeyCode>,
    alarm_fired: bool,
    battery: BatteryReading,
    battery_read_at: Option<NaiveDateTime>,
}

impl MainFrame {
    pub fn new() -> Self {
        Self::default()
    }

    fn refresh_battery(&mut self, ctx: &AppContext) {
        let secs = ctx.ui.battery_refresh_secs.min(MAX_BATTERY_REFRESH_SECS);
        let interval = Duration::seconds(secs as i64);
        let due = self
            .battery_read_at
            .map_or(true, |last| ctx.now - last >= interval || ctx.now < last);
        if due {
            self.battery = BatteryReading {
                charge: ctx.host.battery_charge(),
                status: ctx.host.battery_status(),
            };
            self.battery_read_at = Some(ctx.now);
        }
    }
}

impl Screen<AppContext> for MainFrame {
    fn id(&self) -> ScreenId {
        ScreenId::MainFrame
    }

    fn on_enter(&mut self, _ctx: &mut AppContext) {
        self.alarm_fired = false;
        self.battery_read_at = None;
    }

    fn clear_input(&mut self) {
        self.pending = None;
    }

    fn handle_input(&mut self, key: KeyEvent, _ctx: &AppContext) -> bool {
        let code = Some(key.code);
        if pressed(keys::QUIT_APP, code) || pressed(keys::RADIO_TAB, code) || pressed(keys::ALARM_TAB, code) {
            self.pending = code;
            return true;
        }
        false
    }

    fn on_alarm_event(&mut self, event: AlarmEvent) {
        if event == AlarmEvent::Fired {
            self.alarm_fired = true;
        }
    }

    fn update(&mut self, ctx: &mut AppContext, stack: &[ScreenId]) -> anyhow::Result<NavAction> {
        self.refresh_battery(ctx);
        let top = stack.last().copied();
        if self.alarm_fired {
            self.alarm_fired = false;
            debug!("alarm fired, opening the alarm dialog");
            ctx.save_preferences();
            return Ok(NavAction::PushTop(ScreenId::AlarmDialog));
        }
        let action = if pressed(keys::QUIT_APP, self.pending) {
            NavAction::PushTop(ScreenId::ExitDialog)
        } else if pressed(keys::RADIO_TAB, self.pending) && top == Some(ScreenId::AlarmFrame) {
            NavAction::SwitchTop(ScreenId::RadioFrame)
        } else if pressed(keys::ALARM_TAB, self.pending) && top == Some(ScreenId::RadioFrame) {
            NavAction::SwitchTop(ScreenId::AlarmFrame)
        } else {
            NavAction::NoOp
        };
        Ok(action)
    }

    fn draw(&self, frame: &mut Frame, area: Rect, ctx: &AppContext, stack: &[ScreenId]) -> Rect {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        let top_block = pane_chrome("", false, None);
        let top_inner = top_block.inner(chunks[0]);
        frame.render_widget(top_block, chunks[0]);
        let playback = ctx.alarm.playback();
        let playing = if playback.is_playing() {
            playback.current_channel()
        } else {
            None
        };
        draw_tab_bar(
            frame,
            top_inner,
            stack.contains(&ScreenId::RadioFrame),
            stack.contains(&ScreenId::AlarmFrame),
            playing,
        );

        let bottom_block = pane_chrome("", false, None);
        let bottom_inner = bottom_block.inner(chunks[2]);
        frame.render_widget(bottom_block, chunks[2]);
        draw_clock_bar(
            frame,
            bottom_inner,
            ctx.now,
            ctx.alarm.is_enabled(),
            battery_spans(self.battery.charge, self.battery.status, ctx.ui.battery_low_charge),
        );

        chunks[1]
    }
}
