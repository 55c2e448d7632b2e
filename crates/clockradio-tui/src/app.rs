//! App — the tick loop.
//!
//! Architecture:
//! - `App` owns the `UiStack` (screen registry + active ids) and the
//!   `AppContext` the screens act on.
//! - Every tick: clear input, poll one key without blocking and offer it top
//!   down, advance the alarm scheduler, reap a dead player, let every screen
//!   propose a `NavAction` and resolve them.
//! - Drawing runs at its own cadence (`ui.frame_rate`), never inside the
//!   update phase.
//! - The loop ends when the stack is empty.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime};
use ratatui::crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info, warn};

use crate::action::ScreenId;
use crate::context::AppContext;
use crate::screens::{AlarmDialog, AlarmFrame, AlarmTimeDialog, ExitDialog, MainFrame, RadioFrame, SnoozeDialog};
use crate::stack::UiStack;

pub struct App {
    stack: UiStack<AppContext>,
    ctx: AppContext,
    frame_interval: Duration,
    tick: Duration,
}

impl App {
    pub fn new(ctx: AppContext, frame_interval: Duration) -> Self {
        let tick = Duration::from_millis(ctx.ui.tick_ms);
        let mut stack = UiStack::new();
        stack.register(Box::new(MainFrame::new()));
        stack.register(Box::new(RadioFrame::new()));
        stack.register(Box::new(AlarmFrame::new()));
        stack.register(Box::new(ExitDialog::new()));
        stack.register(Box::new(AlarmDialog::new()));
        stack.register(Box::new(SnoozeDialog::new()));
        stack.register(Box::new(AlarmTimeDialog::new()));
        Self {
            stack,
            ctx,
            frame_interval,
            tick,
        }
    }

    /// Push the initial frames.
    fn start(&mut self) -> anyhow::Result<()> {
        self.stack.push(ScreenId::MainFrame, &mut self.ctx)?;
        self.stack.push(ScreenId::RadioFrame, &mut self.ctx)?;
        Ok(())
    }

    /// One tick.  Returns `false` when `key` was offered and nobody claimed it.
    fn step(&mut self, key: Option<KeyEvent>, now: NaiveDateTime) -> anyhow::Result<bool> {
        self.stack.clear_input();
        let claimed = match key {
            Some(key) => self.stack.dispatch_input(key, &self.ctx),
            None => true,
        };

        self.ctx.now = now;
        // The alarm only starts on its own while the radio frame is in front.
        let suppress = self.stack.top() != Some(ScreenId::RadioFrame);
        if let Some(event) = self.ctx.alarm.update(now, suppress)? {
            self.stack.broadcast_alarm_event(event);
        }
        self.ctx.alarm.reap_player();
        self.stack.update(&mut self.ctx)?;
        Ok(claimed)
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut terminal = or_restore(enter_terminal, restore_terminal)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        info!("shutting down");
        self.ctx.alarm.shutdown();
        self.ctx.save_preferences();
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
        self.ctx.now = Local::now().naive_local();
        self.start()?;
        let mut last_draw: Option<Instant> = None;

        while !self.stack.is_empty() {
            let key = if event::poll(Duration::ZERO)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => Some(key),
                    _ => None,
                }
            } else {
                None
            };

            if !self.step(key, Local::now().naive_local())? {
                execute!(terminal.backend_mut(), Print("\x07"))?;
            }
            if self.stack.is_empty() {
                break;
            }

            if last_draw.map_or(true, |t| t.elapsed() >= self.frame_interval) {
                terminal.draw(|frame| self.stack.draw(frame, &self.ctx))?;
                last_draw = Some(Instant::now());
            }
            tokio::time::sleep(self.tick).await;
        }
        Ok(())
    }
}

// ── Terminal setup ────────────────────────────────────────────────────────────

fn enter_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        warn!("could not leave raw mode: {}", e);
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen) {
        warn!("could not leave alternate screen: {}", e);
    }
}

/// Run `setup`; if it fails, run `restore` before handing back the error.
fn or_restore<T>(
    setup: impl FnOnce() -> anyhow::Result<T>,
    restore: impl FnOnce(),
) -> anyhow::Result<T> {
    match setup() {
        Ok(value) => Ok(value),
        Err(e) => {
            restore();
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::AlarmPhase;
    use crate::testing::{at, contains_text, harness, key, rows, HostCall};
    use ratatui::backend::TestBackend;
    use ratatui::crossterm::event::KeyCode;

    fn app(now: NaiveDateTime) -> App {
        let mut app = App::new(harness(now).ctx, Duration::from_millis(16));
        app.start().unwrap();
        app
    }

    fn ids(app: &App) -> Vec<ScreenId> {
        app.stack.ids().to_vec()
    }

    #[test]
    fn test_starts_on_radio_frame() {
        let app = app(at(12, 0, 0));
        assert_eq!(ids(&app), [ScreenId::MainFrame, ScreenId::RadioFrame]);
    }

    #[test]
    fn test_escape_then_quit_empties_the_stack() {
        let mut app = app(at(12, 0, 0));
        app.step(Some(key(KeyCode::Esc)), at(12, 0, 0)).unwrap();
        assert_eq!(app.stack.top(), Some(ScreenId::ExitDialog));
        app.step(Some(key(KeyCode::Char('q'))), at(12, 0, 0)).unwrap();
        assert!(app.stack.is_empty());
    }

    #[test]
    fn test_unclaimed_key_reports_bell() {
        let mut app = app(at(12, 0, 0));
        assert!(!app.step(Some(key(KeyCode::Char('x'))), at(12, 0, 0)).unwrap());
        assert!(app.step(None, at(12, 0, 0)).unwrap());
    }

    #[test]
    fn test_tab_switch_round_trip() {
        let mut app = app(at(12, 0, 0));
        app.step(Some(key(KeyCode::Char('a'))), at(12, 0, 0)).unwrap();
        assert_eq!(ids(&app), [ScreenId::MainFrame, ScreenId::AlarmFrame]);
        app.step(Some(key(KeyCode::Char('r'))), at(12, 0, 0)).unwrap();
        assert_eq!(ids(&app), [ScreenId::MainFrame, ScreenId::RadioFrame]);
    }

    #[test]
    fn test_alarm_fires_snoozes_and_rings_again() {
        let mut app = app(at(6, 59, 50));
        app.step(None, at(7, 0, 0)).unwrap();
        app.step(None, at(7, 0, 0)).unwrap();
        assert_eq!(app.ctx.alarm.phase(), AlarmPhase::Ringing);
        assert_eq!(app.stack.top(), Some(ScreenId::AlarmDialog));

        app.step(Some(key(KeyCode::Char(' '))), at(7, 0, 5)).unwrap();
        assert_eq!(app.stack.top(), Some(ScreenId::SnoozeDialog));
        assert_eq!(app.ctx.alarm.phase(), AlarmPhase::Snoozing);

        app.step(None, at(7, 10, 5)).unwrap();
        assert_eq!(app.stack.top(), Some(ScreenId::AlarmDialog));
        assert_eq!(app.ctx.alarm.phase(), AlarmPhase::Ringing);

        app.step(Some(key(KeyCode::Esc)), at(7, 10, 6)).unwrap();
        assert_eq!(ids(&app), [ScreenId::MainFrame, ScreenId::RadioFrame]);
        assert_eq!(app.ctx.alarm.phase(), AlarmPhase::Waiting);
        assert!(app.ctx.alarm.playback().is_playing());
    }

    #[test]
    fn test_alarm_is_suppressed_away_from_radio_frame() {
        let mut app = app(at(6, 59, 50));
        app.step(Some(key(KeyCode::Char('a'))), at(6, 59, 55)).unwrap();
        app.step(None, at(7, 0, 0)).unwrap();
        app.step(None, at(7, 0, 1)).unwrap();
        assert_eq!(app.ctx.alarm.phase(), AlarmPhase::ReadyToRing);
        assert_eq!(app.stack.top(), Some(ScreenId::AlarmFrame));

        app.step(Some(key(KeyCode::Char('r'))), at(7, 0, 2)).unwrap();
        app.step(None, at(7, 0, 3)).unwrap();
        assert_eq!(app.stack.top(), Some(ScreenId::AlarmDialog));
    }

    #[test]
    fn test_ring_timeout_closes_dialog() {
        let mut app = app(at(6, 59, 50));
        app.step(None, at(7, 0, 0)).unwrap();
        app.step(None, at(7, 0, 0)).unwrap();
        app.step(None, at(7, 30, 0)).unwrap();
        assert_eq!(ids(&app), [ScreenId::MainFrame, ScreenId::RadioFrame]);
        assert!(!app.ctx.alarm.playback().is_playing());
    }

    #[test]
    fn test_poweroff_from_exit_dialog() {
        let h = harness(at(12, 0, 0));
        let host = h.host.clone();
        let mut app = App::new(h.ctx, Duration::from_millis(16));
        app.start().unwrap();
        app.step(Some(key(KeyCode::Esc)), at(12, 0, 0)).unwrap();
        app.step(Some(key(KeyCode::Char('p'))), at(12, 0, 0)).unwrap();
        assert!(app.stack.is_empty());
        assert_eq!(host.last_call(), Some(HostCall::Poweroff));
    }

    #[test]
    fn test_failed_setup_restores_terminal() {
        let mut restored = false;
        let result: anyhow::Result<()> =
            or_restore(|| Err(anyhow::anyhow!("no tty")), || restored = true);
        assert!(result.is_err());
        assert!(restored);

        let mut restored = false;
        let value = or_restore(|| Ok(7), || restored = true).unwrap();
        assert_eq!(value, 7);
        assert!(!restored);
    }

    #[test]
    fn test_draw_layers_dialog_over_frames() {
        let mut app = app(at(12, 0, 0));
        app.step(Some(key(KeyCode::Esc)), at(12, 0, 0)).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| app.stack.draw(frame, &app.ctx))
            .unwrap();
        let buffer = terminal.backend().buffer();
        assert!(contains_text(buffer, "Radio | Alarm"));
        assert!(contains_text(buffer, "Do you want to Poweroff or Quit to the terminal?"));
        assert!(rows(buffer).last().is_some_and(|r| r.starts_with('└')));
    }
}
