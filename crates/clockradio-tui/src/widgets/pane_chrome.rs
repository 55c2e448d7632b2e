//! PaneChrome — bordered panes and dialog boxes with consistent styling.

use crate::theme::{
    style_focused_border, style_hotkey, style_unfocused_border, C_DIALOG_BG, C_MUTED, C_PANEL_BORDER,
    C_PRIMARY,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear},
    Frame,
};

/// A badge shown in the top-right of the pane header (e.g. "ON", "RINGING").
pub struct Badge<'a> {
    pub text: &'a str,
    pub color: Color,
}

/// Bordered pane.  `focused` marks the pane belonging to the top screen.
pub fn pane_chrome<'a>(title: &'a str, focused: bool, badge: Option<Badge<'a>>) -> Block<'a> {
    let border_style = if focused {
        style_focused_border()
    } else {
        style_unfocused_border()
    };
    let title_style = if focused {
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_MUTED)
    };

    let mut block = Block::default().borders(Borders::ALL).border_style(border_style);
    if !title.is_empty() {
        block = block.title(Line::from(Span::styled(format!(" {} ", title), title_style)));
    }
    if let Some(b) = badge {
        block = block.title_top(
            Line::from(Span::styled(
                format!(" {} ", b.text),
                Style::default().fg(b.color).add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        );
    }
    block
}

/// Fixed-size box centred in `area`, shrunk to fit.
pub fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

/// Clear a centred box and draw the dialog border.  Returns the inner area.
pub fn draw_dialog_box(frame: &mut Frame, area: Rect, width: u16, height: u16) -> Rect {
    let popup = centered_box(width, height, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_PANEL_BORDER))
        .style(Style::default().bg(C_DIALOG_BG));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
    inner
}

/// `label` with its first letter styled as a hotkey: "[T]ime" reads as "Time"
/// with a highlighted "T".
pub fn hotkey_label(label: &str, active: bool) -> Vec<Span<'static>> {
    let mut chars = label.chars();
    let Some(first) = chars.next() else {
        return Vec::new();
    };
    vec![
        Span::styled(first.to_string(), style_hotkey(active)),
        Span::styled(chars.collect::<String>(), Style::default().fg(C_PRIMARY)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_box_fits_and_centres() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_box(52, 5, area), Rect::new(14, 9, 52, 5));
        assert_eq!(centered_box(100, 30, area), area);
    }

    #[test]
    fn test_hotkey_label_splits_first_letter() {
        let spans = hotkey_label("Stop", true);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].content, "S");
        assert_eq!(spans[1].content, "top");
        assert!(hotkey_label("", true).is_empty());
    }
}
