//! Screen trait — the contract every stack layer implements.
//!
//! - Input is claimed in `handle_input` and only acted on in `update`, so all
//!   mutation of the shared context happens in the update phase of a tick.
//! - `update` returns one `NavAction`; the stack resolves them after every
//!   screen has proposed.
//! - `draw` receives the area left by the layer below and returns the area
//!   for the layer above.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::action::{NavAction, ScreenId, ScreenKind};
use crate::alarm::AlarmEvent;

pub trait Screen<C> {
    fn id(&self) -> ScreenId;

    fn kind(&self) -> ScreenKind {
        ScreenKind::Frame
    }

    /// Called right after the screen is pushed.  Transient view state is
    /// (re)initialised here.
    fn on_enter(&mut self, _ctx: &mut C) {}

    /// Called when the screen is popped.
    fn on_exit(&mut self, _ctx: &mut C) {}

    /// Forget the key recorded during the previous tick.
    fn clear_input(&mut self);

    /// Returns `true` to claim the key and stop propagation.
    fn handle_input(&mut self, key: KeyEvent, ctx: &C) -> bool;

    /// Alarm notifications are broadcast to every screen on the stack.
    fn on_alarm_event(&mut self, _event: AlarmEvent) {}

    fn update(&mut self, ctx: &mut C, stack: &[ScreenId]) -> anyhow::Result<NavAction>;

    fn draw(&self, frame: &mut Frame, area: Rect, ctx: &C, stack: &[ScreenId]) -> Rect;
}
