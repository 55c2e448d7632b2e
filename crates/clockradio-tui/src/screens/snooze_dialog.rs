//! SnoozeDialog — counts down the snooze, then hands back to the alarm dialog.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::{NavAction, ScreenId, ScreenKind};
use crate::alarm::AlarmEvent;
use crate::context::AppContext;
use crate::keys::{self, pressed};
use crate::screen::Screen;
use crate::theme::{style_default, style_hotkey};
use crate::widgets::pane_chrome::draw_dialog_box;

#[derive(Default)]
pub struct SnoozeDialog {
    pending: Option<KeyCode>,
    snooze_timeout: bool,
}

impl SnoozeDialog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Screen<AppContext> for SnoozeDialog {
    fn id(&self) -> ScreenId {
        ScreenId::SnoozeDialog
    }

    fn kind(&self) -> ScreenKind {
        ScreenKind::Dialog
    }

    fn on_enter(&mut self, _ctx: &mut AppContext) {
        self.snooze_timeout = false;
    }

    fn clear_input(&mut self) {
        self.pending = None;
    }

    fn handle_input(&mut self, key: KeyEvent, _ctx: &AppContext) -> bool {
        self.pending = Some(key.code);
        true
    }

    fn on_alarm_event(&mut self, event: AlarmEvent) {
        if event == AlarmEvent::SnoozeTimeout {
            self.snooze_timeout = true;
        }
    }

    fn update(&mut self, ctx: &mut AppContext, _stack: &[ScreenId]) -> anyhow::Result<NavAction> {
        if self.snooze_timeout {
            self.snooze_timeout = false;
            return Ok(NavAction::SwitchSelf(ScreenId::AlarmDialog));
        }
        if pressed(keys::EXIT_ALARM, self.pending) {
            ctx.alarm.exit_alarm(ctx.now)?;
            return Ok(NavAction::PopSelf);
        }
        Ok(NavAction::NoOp)
    }

    fn draw(&self, frame: &mut Frame, area: Rect, ctx: &AppContext, _stack: &[ScreenId]) -> Rect {
        let inner = draw_dialog_box(frame, area, 53, 6);
        let seconds = ctx.alarm.snooze_countdown(ctx.now).num_seconds().max(0);
        let text = vec![
            Line::raw(""),
            Line::from(Span::styled(
                format!(" Snooze will exit automatically in {:^4} seconds...", seconds),
                style_default(),
            )),
            Line::from(vec![
                Span::styled(" Press ", style_default()),
                Span::styled("ESC", style_hotkey(true)),
                Span::styled(" to quit the alarm.", style_default()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
        inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::{AlarmPhase, SnoozeOutcome};
    use crate::testing::{at, contains_text, harness, press, render, Harness};

    const STACK: &[ScreenId] = &[ScreenId::MainFrame, ScreenId::RadioFrame, ScreenId::SnoozeDialog];

    fn snoozing() -> Harness {
        let mut h = harness(at(6, 59, 30));
        h.ctx.now = at(7, 0, 0);
        h.ctx.alarm.update(h.ctx.now, false).unwrap();
        h.ctx.alarm.update(h.ctx.now, false).unwrap();
        assert_eq!(h.ctx.alarm.snooze(h.ctx.now).unwrap(), SnoozeOutcome::Snoozing);
        h
    }

    #[test]
    fn test_timeout_switches_back_to_alarm_dialog() {
        let mut h = snoozing();
        let mut screen = SnoozeDialog::new();
        screen.on_enter(&mut h.ctx);
        screen.on_alarm_event(AlarmEvent::SnoozeTimeout);
        screen.clear_input();
        assert_eq!(
            screen.update(&mut h.ctx, STACK).unwrap(),
            NavAction::SwitchSelf(ScreenId::AlarmDialog)
        );
    }

    #[test]
    fn test_escape_exits_alarm() {
        let mut h = snoozing();
        let mut screen = SnoozeDialog::new();
        screen.on_enter(&mut h.ctx);
        let (claimed, action) = press(&mut screen, KeyCode::Char('z'), &mut h.ctx, STACK);
        assert!(claimed);
        assert_eq!(action, NavAction::NoOp);
        let (_, action) = press(&mut screen, KeyCode::Esc, &mut h.ctx, STACK);
        assert_eq!(action, NavAction::PopSelf);
        assert_eq!(h.ctx.alarm.phase(), AlarmPhase::Waiting);
    }

    #[test]
    fn test_draw_countdown() {
        let mut h = snoozing();
        h.ctx.now = at(7, 1, 0);
        let buffer = render(&SnoozeDialog::new(), &h.ctx, STACK);
        assert!(contains_text(&buffer, "Snooze will exit automatically in 540  seconds..."));
        assert!(contains_text(&buffer, "Press ESC to quit the alarm."));
    }
}
