//! RadioFrame — browse channels, start/stop manual playback, radio volume.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::{NavAction, ScreenId};
use crate::context::AppContext;
use crate::keys::{self, pressed};
use crate::screen::Screen;
use crate::theme::{style_default, C_MUTED, C_PLAYING};
use crate::widgets::channel_list::{draw_channel_list, ChannelCursor};
use crate::widgets::pane_chrome::{hotkey_label, pane_chrome, Badge};
use crate::widgets::volume_bar::draw_volume_bar;

const PLAYING_MARKER: &str = "▶";

#[derive(Default)]
pub struct RadioFrame {
    pending: Option<KeyCode>,
    cursor: ChannelCursor,
}

impl RadioFrame {
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&mut self, ctx: &mut AppContext) {
        if let Some(name) = self.cursor.selected_name(ctx.channel_names()) {
            ctx.current_channel = Some(name.to_string());
            ctx.save_preferences();
        }
    }
}

impl Screen<AppContext> for RadioFrame {
    fn id(&self) -> ScreenId {
        ScreenId::RadioFrame
    }

    fn on_enter(&mut self, ctx: &mut AppContext) {
        self.cursor = ChannelCursor::on(ctx.channel_names(), ctx.current_channel.as_deref());
    }

    fn clear_input(&mut self) {
        self.pending = None;
    }

    fn handle_input(&mut self, key: KeyEvent, _ctx: &AppContext) -> bool {
        let code = Some(key.code);
        let claimed = [
            keys::CHANNEL_UP,
            keys::CHANNEL_DOWN,
            keys::PLAY_RADIO,
            keys::STOP_RADIO,
            keys::PAUSE_RADIO,
            keys::VOLUME_UP,
            keys::VOLUME_DOWN,
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
        let playing = ctx.alarm.playback().is_playing();
        if pressed(keys::CHANNEL_DOWN, key) {
            self.cursor.select_down(ctx.channel_names().len());
            self.select(ctx);
        } else if pressed(keys::CHANNEL_UP, key) {
            self.cursor.select_up();
            self.select(ctx);
        } else if pressed(keys::STOP_RADIO, key) && playing {
            ctx.alarm.stop_radio();
        } else if pressed(keys::PAUSE_RADIO, key) && playing {
            ctx.alarm.pause_radio();
        } else if pressed(keys::PLAY_RADIO, key) && !playing {
            if let Some(name) = ctx.current_channel.clone() {
                ctx.alarm.play_radio(&name, ctx.now)?;
            }
        } else if pressed(keys::VOLUME_UP, key) {
            ctx.alarm.increase_radio_volume();
            ctx.save_preferences();
        } else if pressed(keys::VOLUME_DOWN, key) {
            ctx.alarm.decrease_radio_volume();
            ctx.save_preferences();
        }
        Ok(NavAction::NoOp)
    }

    fn draw(&self, frame: &mut Frame, area: Rect, ctx: &AppContext, stack: &[ScreenId]) -> Rect {
        let active = stack.last() == Some(&ScreenId::RadioFrame);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(area);

        let playback = ctx.alarm.playback();
        let playing = playback.is_playing();
        let badge = match (playing, playback.is_paused()) {
            (true, true) => Some(Badge {
                text: "PAUSED",
                color: C_MUTED,
            }),
            (true, false) => Some(Badge {
                text: "ON AIR",
                color: C_PLAYING,
            }),
            _ => None,
        };
        let list_block = pane_chrome("Channels", active, badge);
        let list_area = list_block.inner(chunks[0]);
        frame.render_widget(list_block, chunks[0]);
        draw_channel_list(
            frame,
            list_area,
            ctx.channel_names(),
            self.cursor.selected,
            playback.current_channel().filter(|_| playing),
            PLAYING_MARKER,
            active,
        );

        let controls_block = pane_chrome("", active, None);
        let controls = controls_block.inner(chunks[1]);
        frame.render_widget(controls_block, chunks[1]);
        let mut spans = vec![Span::raw(" ")];
        spans.extend(hotkey_label(if playing { "Stop" } else { "Play" }, active));
        spans.push(Span::styled(" | Volume ", style_default()));
        let label_width: u16 = spans.iter().map(|s| s.width() as u16).sum();
        frame.render_widget(Paragraph::new(Line::from(spans)), controls);
        let bar = Rect {
            x: controls.x + label_width,
            width: controls.width.saturating_sub(label_width + 1),
            ..controls
        };
        let limits = ctx.alarm.limits();
        draw_volume_bar(frame, bar, limits.fraction(ctx.alarm.radio_volume()), active);

        area
    }
}
