//! Key bindings per screen.

use ratatui::crossterm::event::KeyCode;

// Main frame
pub const QUIT_APP: &[KeyCode] = &[KeyCode::Esc];
pub const RADIO_TAB: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
pub const ALARM_TAB: &[KeyCode] = &[KeyCode::Char('a'), KeyCode::Char('A')];

// Radio and alarm frames
pub const CHANNEL_UP: &[KeyCode] = &[KeyCode::Up];
pub const CHANNEL_DOWN: &[KeyCode] = &[KeyCode::Down];
pub const VOLUME_UP: &[KeyCode] = &[KeyCode::Right];
pub const VOLUME_DOWN: &[KeyCode] = &[KeyCode::Left];
pub const PLAY_RADIO: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P')];
pub const STOP_RADIO: &[KeyCode] = &[KeyCode::Char('s'), KeyCode::Char('S')];
pub const PAUSE_RADIO: &[KeyCode] = &[KeyCode::Char(' ')];
pub const ENABLE_ALARM: &[KeyCode] = &[KeyCode::Char('e'), KeyCode::Char('E')];
pub const DISABLE_ALARM: &[KeyCode] = &[KeyCode::Char('d'), KeyCode::Char('D')];
pub const SET_ALARM_TIME: &[KeyCode] = &[KeyCode::Char('t'), KeyCode::Char('T')];

// Dialogs
pub const CANCEL_DIALOG: &[KeyCode] = &[KeyCode::Esc];
pub const POWEROFF: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P')];
pub const QUIT_TO_TERMINAL: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];
pub const EXIT_ALARM: &[KeyCode] = &[KeyCode::Esc];

// Alarm time editor
pub const ENTER_INPUT: &[KeyCode] = &[KeyCode::Enter];
pub const CANCEL_INPUT: &[KeyCode] = &[KeyCode::Esc];
pub const INCREASE_DIGIT: &[KeyCode] = &[KeyCode::Up];
pub const DECREASE_DIGIT: &[KeyCode] = &[KeyCode::Down];
pub const NEXT_DIGIT: &[KeyCode] = &[KeyCode::Right];
pub const PREVIOUS_DIGIT: &[KeyCode] = &[KeyCode::Left];

/// Whether the key recorded this tick is one of `binding`.
pub fn pressed(binding: &[KeyCode], key: Option<KeyCode>) -> bool {
    key.is_some_and(|k| binding.contains(&k))
}
