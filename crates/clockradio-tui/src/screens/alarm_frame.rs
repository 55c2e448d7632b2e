//! AlarmFrame — alarm time, on/off, alarm volume and alarm channel.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::{NavAction, ScreenId};
use crate::alarm::AlarmPhase;
use crate::context::AppContext;
use crate::keys::{self, pressed};
use crate::screen::Screen;
use crate::theme::{style_default, C_ALARM, C_MUTED};
use crate::widgets::channel_list::{draw_channel_list, ChannelCursor};
use crate::widgets::pane_chrome::{hotkey_label, pane_chrome, Badge};
use crate::widgets::volume_bar::draw_volume_bar;

const ALARM_MARKER: &str = "◆";

#[derive(Default)]
pub struct AlarmFrame {
    pending: Option<KeyCode>,
    cursor: ChannelCursor,
}

impl AlarmFrame {
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&mut self, ctx: &mut AppContext) {
        if let Some(name) = self.cursor.selected_name(ctx.channel_names()).map(str::to_string) {
            ctx.alarm.set_alarm_channel(&name);
            ctx.save_preferences();
        }
    }
}

impl Screen<AppContext> for AlarmFrame {
    fn id(&self) -> ScreenId {
        ScreenId::AlarmFrame
    }

    fn on_enter(&mut self, ctx: &mut AppContext) {
        self.cursor = ChannelCursor::on(ctx.channel_names(), ctx.alarm.alarm_channel());
    }

    fn clear_input(&mut self) {
        self.pending = None;
    }

    fn handle_input(&mut self, key: KeyEvent, _ctx: &AppContext) -> bool {
        let code = Some(key.code);
        let claimed = [
            keys::CHANNEL_UP,
            keys::CHANNEL_DOWN,
            keys::VOLUME_UP,
            keys::VOLUME_DOWN,
            keys::ENABLE_ALARM,
            keys::DISABLE_ALARM,
            keys::SET_ALARM_TIME,
        ]
        .iter()
        .any(|binding| pressed(binding, code));
        if claimed {
            self.pending = code;
        }
        claimed
    }

    fn update(&mut self, ctx: &mut AppContext, _stack: &[ScreenId]) -> anyhow::Result<NavAction> {
        let key = self.pending;
        let enabled = ctx.alarm.is_enabled();
        let len = ctx.channel_names().len();
        if (pressed(keys::ENABLE_ALARM, key) && !enabled) || (pressed(keys::DISABLE_ALARM, key) && enabled) {
            ctx.alarm.toggle(ctx.now);
            ctx.save_preferences();
        } else if pressed(keys::CHANNEL_DOWN, key) {
            self.cursor.select_next_wrapping(len);
            self.select(ctx);
        } else if pressed(keys::CHANNEL_UP, key) {
            self.cursor.select_prev_wrapping(len);
            self.select(ctx);
        } else if pressed(keys::VOLUME_UP, key) {
            ctx.alarm.increase_alarm_volume();
            ctx.save_preferences();
        } else if pressed(keys::VOLUME_DOWN, key) {
            ctx.alarm.decrease_alarm_volume();
            ctx.save_preferences();
        } else if pressed(keys::SET_ALARM_TIME, key) {
            return Ok(NavAction::PushTop(ScreenId::AlarmTimeDialog));
        }
        Ok(NavAction::NoOp)
    }

    fn draw(&self, frame: &mut Frame, area: Rect, ctx: &AppContext, stack: &[ScreenId]) -> Rect {
        let active = stack.last() == Some(&ScreenId::AlarmFrame);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        let enabled = ctx.alarm.is_enabled();
        let badge = match ctx.alarm.phase() {
            AlarmPhase::Ringing => Some(Badge { text: "RINGING", color: C_ALARM }),
            AlarmPhase::Snoozing => Some(Badge { text: "SNOOZING", color: C_ALARM }),
            _ if enabled => Some(Badge { text: "ON", color: C_ALARM }),
            _ => Some(Badge { text: "OFF", color: C_MUTED }),
        };
        let settings_block = pane_chrome("Alarm", active, badge);
        let settings = settings_block.inner(chunks[0]);
        frame.render_widget(settings_block, chunks[0]);

        let mut spans = vec![Span::raw(" ")];
        spans.extend(hotkey_label("Time", active));
        spans.push(Span::styled(format!(": {} | ", ctx.alarm.alarm_time()), style_default()));
        spans.extend(hotkey_label(if enabled { "Disable" } else { "Enable " }, active));
        spans.push(Span::styled(" | Volume ", style_default()));
        let label_width: u16 = spans.iter().map(|s| s.width() as u16).sum();
        frame.render_widget(Paragraph::new(Line::from(spans)), settings);
        let bar = Rect {
            x: settings.x + label_width,
            width: settings.width.saturating_sub(label_width + 1),
            ..settings
        };
        let limits = ctx.alarm.limits();
        draw_volume_bar(frame, bar, limits.fraction(ctx.alarm.alarm_volume()), active);

        let list_block = pane_chrome("Wake up to", active, None);
        let list_area = list_block.inner(chunks[1]);
        frame.render_widget(list_block, chunks[1]);
        draw_channel_list(
            frame,
            list_area,
            ctx.channel_names(),
            self.cursor.selected,
            ctx.alarm.alarm_channel(),
            if enabled { ALARM_MARKER } else { "" },
            active,
        );

        area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, contains_text, harness, press, render, HostCall};
    use clockradio_proto::prefs::keys as pref_keys;

    const STACK: &[ScreenId] = &[ScreenId::MainFrame, ScreenId::AlarmFrame];

    #[test]
    fn test_enable_disable_only_toggle_on_change() {
        let mut h = harness(at(12, 0, 0));
        let mut screen = AlarmFrame::new();
        screen.on_enter(&mut h.ctx);
        assert!(h.ctx.alarm.is_enabled());

        press(&mut screen, KeyCode::Char('e'), &mut h.ctx, STACK);
        assert!(h.ctx.alarm.is_enabled());
        press(&mut screen, KeyCode::Char('d'), &mut h.ctx, STACK);
        assert!(!h.ctx.alarm.is_enabled());
        assert_eq!(h.host.last_call(), Some(HostCall::CancelWake));
        assert!(!h.ctx.prefs.bool(pref_keys::ALARM_ENABLED));
        press(&mut screen, KeyCode::Char('D'), &mut h.ctx, STACK);
        assert!(!h.ctx.alarm.is_enabled());
    }

    #[test]
    fn test_channel_selection_wraps() {
        let mut h = harness(at(12, 0, 0));
        let mut screen = AlarmFrame::new();
        screen.on_enter(&mut h.ctx);
        assert_eq!(screen.cursor.selected, 1);

        press(&mut screen, KeyCode::Down, &mut h.ctx, STACK);
        press(&mut screen, KeyCode::Down, &mut h.ctx, STACK);
        assert_eq!(h.ctx.alarm.alarm_channel(), Some("Jazz"));
        press(&mut screen, KeyCode::Up, &mut h.ctx, STACK);
        assert_eq!(h.ctx.alarm.alarm_channel(), Some("News"));
        assert_eq!(
            h.ctx.prefs.string(pref_keys::ALARM_CHANNEL).as_deref(),
            Some("News")
        );
    }

    #[test]
    fn test_volume_and_time_keys() {
        let mut h = harness(at(12, 0, 0));
        let mut screen = AlarmFrame::new();
        screen.on_enter(&mut h.ctx);
        press(&mut screen, KeyCode::Right, &mut h.ctx, STACK);
        assert_eq!(h.ctx.alarm.alarm_volume(), 45);
        assert_eq!(h.ctx.prefs.int(pref_keys::ALARM_VOLUME), 45);

        let (claimed, action) = press(&mut screen, KeyCode::Char('t'), &mut h.ctx, STACK);
        assert!(claimed);
        assert_eq!(action, NavAction::PushTop(ScreenId::AlarmTimeDialog));
    }

    #[test]
    fn test_draw_shows_time_and_marker() {
        let mut h = harness(at(12, 0, 0));
        let mut screen = AlarmFrame::new();
        screen.on_enter(&mut h.ctx);
        let buffer = render(&screen, &h.ctx, STACK);
        assert!(contains_text(&buffer, "Time: 07:00 | Disable | Volume ◀"));
        assert!(contains_text(&buffer, "◆ Rock"));

        press(&mut screen, KeyCode::Char('d'), &mut h.ctx, STACK);
        let buffer = render(&screen, &h.ctx, STACK);
        assert!(contains_text(&buffer, "Enable  | Volume"));
        assert!(!contains_text(&buffer, "◆ Rock"));
    }
}
