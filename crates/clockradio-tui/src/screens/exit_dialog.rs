//! ExitDialog — confirm poweroff or quit to the terminal.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::info;

use crate::action::{NavAction, ScreenId, ScreenKind};
use crate::context::AppContext;
use crate::keys::{self, pressed};
use crate::screen::Screen;
use crate::theme::style_default;
use crate::widgets::pane_chrome::{draw_dialog_box, hotkey_label};

#[derive(Default)]
pub struct ExitDialog {
    pending: Option<KeyCode>,
}

impl ExitDialog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Screen<AppContext> for ExitDialog {
    fn id(&self) -> ScreenId {
        ScreenId::ExitDialog
    }

    fn kind(&self) -> ScreenKind {
        ScreenKind::Dialog
    }

    fn clear_input(&mut self) {
        self.pending = None;
    }

    fn handle_input(&mut self, key: KeyEvent, _ctx: &AppContext) -> bool {
        self.pending = Some(key.code);
        true
    }

    fn update(&mut self, ctx: &mut AppContext, stack: &[ScreenId]) -> anyhow::Result<NavAction> {
        let bottom = stack.first().copied().unwrap_or(ScreenId::ExitDialog);
        let action = if pressed(keys::CANCEL_DIALOG, self.pending) {
            NavAction::PopSelf
        } else if pressed(keys::QUIT_TO_TERMINAL, self.pending) {
            info!("quit to terminal");
            NavAction::Pop(bottom)
        } else if pressed(keys::POWEROFF, self.pending) {
            info!("poweroff requested");
            ctx.save_preferences();
            ctx.host.poweroff();
            NavAction::Pop(bottom)
        } else {
            NavAction::NoOp
        };
        Ok(action)
    }

    fn draw(&self, frame: &mut Frame, area: Rect, _ctx: &AppContext, _stack: &[ScreenId]) -> Rect {
        let inner = draw_dialog_box(frame, area, 52, 5);
        let mut spans = vec![Span::styled(" Do you want to ", style_default())];
        spans.extend(hotkey_label("Poweroff", true));
        spans.push(Span::styled(" or ", style_default()));
        spans.extend(hotkey_label("Quit", true));
        spans.push(Span::styled(" to the terminal?", style_default()));
        let text = vec![Line::raw(""), Line::from(spans)];
        frame.render_widget(Paragraph::new(text), inner);
        inner
    }
}
