//! AlarmDialog — shown while the alarm rings.  Esc keeps the radio on, any
//! other key snoozes.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::{NavAction, ScreenId, ScreenKind};
use crate::alarm::{AlarmEvent, SnoozeOutcome};
use crate::context::AppContext;
use crate::keys::{self, pressed};
use crate::screen::Screen;
use crate::theme::{style_default, style_hotkey};
use crate::widgets::pane_chrome::draw_dialog_box;

#[derive(Default)]
pub struct AlarmDialog {
    pending: Option<KeyCode>,
    ring_timeout: bool,
}

impl AlarmDialog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Screen<AppContext> for AlarmDialog {
    fn id(&self) -> ScreenId {
        ScreenId::AlarmDialog
    }

    fn kind(&self) -> ScreenKind {
        ScreenKind::Dialog
    }

    fn on_enter(&mut self, _ctx: &mut AppContext) {
        self.ring_timeout = false;
    }

    fn clear_input(&mut self) {
        self.pending = None;
    }

    fn handle_input(&mut self, key: KeyEvent, _ctx: &AppContext) -> bool {
        self.pending = Some(key.code);
        true
    }

    fn on_alarm_event(&mut self, event: AlarmEvent) {
        if event == AlarmEvent::RingTimeout {
            self.ring_timeout = true;
        }
    }

    fn update(&mut self, ctx: &mut AppContext, _stack: &[ScreenId]) -> anyhow::Result<NavAction> {
        if self.ring_timeout {
            self.ring_timeout = false;
            return Ok(NavAction::PopSelf);
        }
        if pressed(keys::EXIT_ALARM, self.pending) {
            ctx.alarm.exit_alarm(ctx.now)?;
            return Ok(NavAction::PopSelf);
        }
        if self.pending.is_some() {
            return Ok(match ctx.alarm.snooze(ctx.now)? {
                SnoozeOutcome::Snoozing => NavAction::SwitchSelf(ScreenId::SnoozeDialog),
                SnoozeOutcome::Exhausted => NavAction::PopSelf,
            });
        }
        Ok(NavAction::NoOp)
    }

    fn draw(&self, frame: &mut Frame, area: Rect, ctx: &AppContext, _stack: &[ScreenId]) -> Rect {
        let inner = draw_dialog_box(frame, area, 52, 7);
        let seconds = ctx.alarm.ring_countdown(ctx.now).num_seconds().max(0);
        let mut text = vec![
            Line::raw(""),
            Line::from(Span::styled(
                format!(" Alarm will exit automatically in {:^4} seconds...", seconds),
                style_default(),
            )),
        ];
        if ctx.alarm.next_snooze_quits() {
            text.push(Line::from(Span::styled(
                " Press any key to quit the alarm.",
                style_default(),
            )));
        } else {
            text.push(Line::from(vec![
                Span::styled(" Press ", style_default()),
                Span::styled("ESC", style_hotkey(true)),
                Span::styled(" to continue listening to the radio,", style_default()),
            ]));
            text.push(Line::from(vec![
                Span::styled(" any other key", style_hotkey(true)),
                Span::styled(" to snooze.", style_default()),
            ]));
        }
        frame.render_widget(Paragraph::new(text), inner);
        inner
    }
}
