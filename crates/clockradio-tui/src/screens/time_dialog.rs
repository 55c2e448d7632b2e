//! AlarmTimeDialog — four-digit `HH:MM` editor.
//!
//! Left/Right move the focused digit (wrapping), Up/Down change it within the
//! bounds that keep the time valid, Enter applies, Esc cancels.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use clockradio_proto::prefs::{AlarmTime, AlarmTimeError};

use crate::action::{NavAction, ScreenId, ScreenKind};
use crate::context::AppContext;
use crate::keys::{self, pressed};
use crate::screen::Screen;
use crate::theme::{style_default, style_hotkey};
use crate::widgets::pane_chrome::draw_dialog_box;

const PROMPT: &str = " Insert new alarm time: ";

/// Digits of an `HH:MM` time being edited, plus the focused position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInput {
    digits: [u8; 4],
    focus: usize,
}

impl TimeInput {
    pub fn from_time(time: AlarmTime) -> Self {
        Self {
            digits: [
                time.hour() / 10,
                time.hour() % 10,
                time.minute() / 10,
                time.minute() % 10,
            ],
            focus: 0,
        }
    }

    pub fn to_time(self) -> Result<AlarmTime, AlarmTimeError> {
        let [h1, h2, m1, m2] = self.digits;
        AlarmTime::new(h1 * 10 + h2, m1 * 10 + m2)
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn move_focus(&mut self, delta: isize) {
        self.focus = (self.focus as isize + delta).rem_euclid(4) as usize;
    }

    /// Largest value the focused digit may take given its neighbours.
    fn max_digit(&self) -> u8 {
        match self.focus {
            0 if self.digits[1] <= 3 => 2,
            0 => 1,
            1 if self.digits[0] <= 1 => 9,
            1 => 3,
            2 => 5,
            _ => 9,
        }
    }

    /// Step the focused digit by ±1, wrapping within its bounds.
    pub fn adjust(&mut self, up: bool) {
        let max = self.max_digit();
        let current = self.digits[self.focus];
        self.digits[self.focus] = match (up, current) {
            (true, d) if d >= max => 0,
            (true, d) => d + 1,
            (false, 0) => max,
            (false, d) => (d - 1).min(max),
        };
    }

    /// `HH:MM` with the column of the focused digit.
    pub fn text(&self) -> (String, usize) {
        let [h1, h2, m1, m2] = self.digits;
        let column = if self.focus < 2 { self.focus } else { self.focus + 1 };
        (format!("{}{}:{}{}", h1, h2, m1, m2), column)
    }
}

pub struct AlarmTimeDialog {
    pending: Option<KeyCode>,
    input: TimeInput,
}

impl Default for AlarmTimeDialog {
    fn default() -> Self {
        Self {
            pending: None,
            input: TimeInput::from_time(AlarmTime::default()),
        }
    }
}

impl AlarmTimeDialog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Screen<AppContext> for AlarmTimeDialog {
    fn id(&self) -> ScreenId {
        ScreenId::AlarmTimeDialog
    }

    fn kind(&self) -> ScreenKind {
        ScreenKind::Dialog
    }

    fn on_enter(&mut self, ctx: &mut AppContext) {
        self.input = TimeInput::from_time(ctx.alarm.alarm_time());
    }

    fn clear_input(&mut self) {
        self.pending = None;
    }

    fn handle_input(&mut self, key: KeyEvent, _ctx: &AppContext) -> bool {
        self.pending = Some(key.code);
        true
    }

    fn update(&mut self, ctx: &mut AppContext, _stack: &[ScreenId]) -> anyhow::Result<NavAction> {
        let key = self.pending;
        if pressed(keys::ENTER_INPUT, key) {
            ctx.alarm.set_alarm_time(self.input.to_time()?, ctx.now);
            ctx.save_preferences();
            return Ok(NavAction::PopSelf);
        } else if pressed(keys::CANCEL_INPUT, key) {
            return Ok(NavAction::PopSelf);
        } else if pressed(keys::INCREASE_DIGIT, key) {
            self.input.adjust(true);
        } else if pressed(keys::DECREASE_DIGIT, key) {
            self.input.adjust(false);
        } else if pressed(keys::NEXT_DIGIT, key) {
            self.input.move_focus(1);
        } else if pressed(keys::PREVIOUS_DIGIT, key) {
            self.input.move_focus(-1);
        }
        Ok(NavAction::NoOp)
    }

    fn draw(&self, frame: &mut Frame, area: Rect, _ctx: &AppContext, _stack: &[ScreenId]) -> Rect {
        let inner = draw_dialog_box(frame, area, 34, 7);
        let (time, column) = self.input.text();
        let offset = PROMPT.chars().count() + 1 + column;
        let arrow_row = |arrow: &'static str| {
            Line::from(vec![
                Span::raw(" ".repeat(offset)),
                Span::styled(arrow, style_hotkey(true)),
            ])
        };

        let mut digits = Vec::new();
        for (i, ch) in time.chars().enumerate() {
            let style = if i == column {
                style_default().add_modifier(Modifier::REVERSED)
            } else {
                style_default()
            };
            digits.push(Span::styled(ch.to_string(), style));
        }
        let mut editor = vec![
            Span::styled(PROMPT, style_default()),
            Span::styled("◀", style_hotkey(true)),
        ];
        editor.extend(digits);
        editor.push(Span::styled("▶", style_hotkey(true)));

        let text = vec![
            Line::raw(""),
            arrow_row("▲"),
            Line::from(editor),
            arrow_row("▼"),
        ];
        frame.render_widget(Paragraph::new(text), inner);
        inner
    }
}
