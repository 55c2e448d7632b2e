//! Channel list centred on the selection, with a vertical scrollbar in the
//! rightmost column.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{style_default, style_hotkey, style_muted, style_selected};

const FILLER: &str = "...";
const UP_ARROW: char = '▲';
const DOWN_ARROW: char = '▼';
const TRACK: char = '▒';
const THUMB: char = '◆';

/// Selection over a fixed list of channel names.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ChannelCursor {
    pub selected: usize,
}

impl ChannelCursor {
    /// Cursor on `name`, or on the first entry when it is absent.
    pub fn on(names: &[String], name: Option<&str>) -> Self {
        let selected = name
            .and_then(|n| names.iter().position(|c| c == n))
            .unwrap_or(0);
        Self { selected }
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self, len: usize) {
        self.selected = (self.selected + 1).min(len.saturating_sub(1));
    }

    pub fn select_prev_wrapping(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = if self.selected == 0 {
            len - 1
        } else {
            self.selected - 1
        };
    }

    pub fn select_next_wrapping(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1) % len;
    }

    pub fn selected_name<'a>(&self, names: &'a [String]) -> Option<&'a str> {
        names.get(self.selected).map(String::as_str)
    }
}

/// Item index shown on each of `height` rows, with the selection on the
/// middle row.  `None` rows fall outside the list.
pub fn visible_rows(len: usize, selected: usize, height: usize) -> Vec<Option<usize>> {
    let central = height / 2;
    (0..height)
        .map(|row| {
            let index = (selected + row).checked_sub(central)?;
            (index < len).then_some(index)
        })
        .collect()
}

/// `text` centred in `width` display cells; extra padding goes on the right.
pub fn center_padded(text: &str, width: usize) -> String {
    let used = text.width();
    if used >= width {
        return text.to_string();
    }
    let left = (width - used) / 2;
    let right = width - used - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Scrollbar glyphs top to bottom for a bar `height` rows tall.
pub fn scrollbar_column(height: usize, fraction: f64) -> Vec<char> {
    if height < 3 {
        return Vec::new();
    }
    let slider = height - 2;
    let thumb = ((slider as f64 * fraction.clamp(0.0, 1.0)).round() as usize).min(slider - 1);
    let mut column = Vec::with_capacity(height);
    column.push(UP_ARROW);
    column.extend((0..slider).map(|i| if i == thumb { THUMB } else { TRACK }));
    column.push(DOWN_ARROW);
    column
}

/// Draw `names` centred on `selected`.  The entry equal to `marked` is
/// prefixed with `marker` when the marker is non-empty.
pub fn draw_channel_list(
    frame: &mut Frame,
    area: Rect,
    names: &[String],
    selected: usize,
    marked: Option<&str>,
    marker: &str,
    active: bool,
) {
    if area.width < 2 || area.height == 0 {
        return;
    }
    let height = area.height as usize;
    let list_width = area.width as usize - 1;
    let central = height / 2;

    let lines: Vec<Line> = visible_rows(names.len(), selected, height)
        .into_iter()
        .enumerate()
        .map(|(row, index)| match index {
            None => Line::from(Span::styled(center_padded(FILLER, list_width), style_muted())),
            Some(i) => {
                let name = &names[i];
                let text = if !marker.is_empty() && marked == Some(name.as_str()) {
                    format!("{} {}", marker, name)
                } else {
                    name.clone()
                };
                let style = if row == central {
                    style_selected(active)
                } else {
                    style_default()
                };
                Line::from(Span::styled(center_padded(&text, list_width), style))
            }
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines),
        Rect {
            width: list_width as u16,
            ..area
        },
    );

    if names.is_empty() {
        return;
    }
    let fraction = selected as f64 / names.len() as f64;
    let bar: Vec<Line> = scrollbar_column(height, fraction)
        .into_iter()
        .enumerate()
        .map(|(i, glyph)| {
            let style = if i == 0 || i == height - 1 {
                style_hotkey(active)
            } else {
                style_default()
            };
            Line::from(Span::styled(glyph.to_string(), style))
        })
        .collect();
    frame.render_widget(
        Paragraph::new(bar),
        Rect {
            x: area.x + list_width as u16,
            width: 1,
            ..area
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rows_centre_on_selection() {
        assert_eq!(
            visible_rows(3, 0, 5),
            vec![None, None, Some(0), Some(1), Some(2)]
        );
        assert_eq!(
            visible_rows(10, 9, 4),
            vec![Some(7), Some(8), Some(9), None]
        );
    }

    #[test]
    fn test_center_padded_puts_extra_space_right() {
        assert_eq!(center_padded("ab", 5), " ab  ");
        assert_eq!(center_padded("toolong", 3), "toolong");
        assert_eq!(center_padded("日本", 6), " 日本 ");
    }

    #[test]
    fn test_scrollbar_thumb_stays_inside_arrows() {
        assert_eq!(scrollbar_column(5, 0.0), vec!['▲', '◆', '▒', '▒', '▼']);
        assert_eq!(scrollbar_column(5, 1.0), vec!['▲', '▒', '▒', '◆', '▼']);
        assert!(scrollbar_column(2, 0.5).is_empty());
    }

    #[test]
    fn test_cursor_clamps_and_wraps() {
        let list = names(&["Jazz", "Rock", "News"]);
        let mut cursor = ChannelCursor::on(&list, Some("News"));
        assert_eq!(cursor.selected, 2);
        cursor.select_down(list.len());
        assert_eq!(cursor.selected, 2);
        cursor.select_next_wrapping(list.len());
        assert_eq!(cursor.selected_name(&list), Some("Jazz"));
        cursor.select_prev_wrapping(list.len());
        assert_eq!(cursor.selected_name(&list), Some("News"));
        cursor.select_up();
        assert_eq!(cursor.selected_name(&list), Some("Rock"));

        assert_eq!(ChannelCursor::on(&list, Some("Gone")).selected, 0);
        let mut empty = ChannelCursor::default();
        empty.select_next_wrapping(0);
        assert_eq!(empty.selected, 0);
    }
}
