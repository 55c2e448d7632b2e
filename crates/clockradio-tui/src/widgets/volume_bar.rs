//! Horizontal volume slider: `◀▒▒▒◆▒▒▒▒▶`.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{style_hotkey, C_PLAYING, C_SECONDARY};

const LEFT_ARROW: char = '◀';
const RIGHT_ARROW: char = '▶';
const TRACK: char = '▒';
const THUMB: char = '◆';

/// Track between the arrows for a bar `width` cells wide.  `fraction` is 0.0..=1.0.
pub fn slider_track(width: usize, fraction: f64) -> String {
    let slider = width.saturating_sub(3);
    let thumb = (slider as f64 * fraction.clamp(0.0, 1.0)).round() as usize;
    let mut track = String::with_capacity(width * 3);
    track.extend(std::iter::repeat(TRACK).take(thumb));
    track.push(THUMB);
    track.extend(std::iter::repeat(TRACK).take(slider - thumb));
    track
}

pub fn draw_volume_bar(frame: &mut Frame, area: Rect, fraction: f64, active: bool) {
    if area.width < 4 || area.height == 0 {
        return;
    }
    let arrows = style_hotkey(active);
    let line = Line::from(vec![
        Span::styled(LEFT_ARROW.to_string(), arrows),
        Span::styled(
            slider_track(area.width as usize, fraction),
            Style::default().fg(if active { C_PLAYING } else { C_SECONDARY }),
        ),
        Span::styled(RIGHT_ARROW.to_string(), arrows),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
