//! Status bars — tab line at the top, clock and battery at the bottom.

use chrono::NaiveDateTime;
use clockradio_proto::host::BatteryStatus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{
    style_default, style_hotkey, style_playing, style_secondary, C_BATTERY_LOW, C_SEPARATOR,
};

const SEPARATOR: &str = " | ";

/// One tab label.  The active tab is drawn reversed; an inactive tab shows
/// its hotkey letter.
fn tab_spans(label: &'static str, active: bool) -> Vec<Span<'static>> {
    if active {
        return vec![Span::styled(
            label,
            style_default().add_modifier(Modifier::REVERSED),
        )];
    }
    let (first, rest) = label.split_at(1);
    vec![
        Span::styled(first, style_hotkey(true)),
        Span::styled(rest, style_secondary()),
    ]
}

/// Tab labels followed by the playing channel, if any.
pub fn draw_tab_bar(
    frame: &mut Frame,
    area: Rect,
    radio_active: bool,
    alarm_active: bool,
    playing: Option<&str>,
) {
    let mut spans = vec![Span::raw(" ")];
    spans.extend(tab_spans("Radio", radio_active));
    spans.push(Span::styled(SEPARATOR, Style::default().fg(C_SEPARATOR)));
    spans.extend(tab_spans("Alarm", alarm_active));
    spans.push(Span::styled(SEPARATOR, Style::default().fg(C_SEPARATOR)));
    if let Some(name) = playing {
        spans.push(Span::styled("Playing channel: ", style_secondary()));
        spans.push(Span::styled(name.to_string(), style_playing()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// `HH:MM:SS - DD Mon YYYY | Alarm is On`
pub fn clock_text(now: NaiveDateTime, alarm_on: bool) -> String {
    format!(
        "{} | Alarm is {}",
        now.format("%H:%M:%S - %d %b %Y"),
        if alarm_on { "On " } else { "Off" }
    )
}

/// Battery readout: `| Battery  80% ↑`.  Unknown charge shows `---`.
pub fn battery_spans(
    charge: Option<u8>,
    status: BatteryStatus,
    low_threshold: u8,
) -> Vec<Span<'static>> {
    let arrow = match status {
        BatteryStatus::Charging => "↑",
        BatteryStatus::Discharging => "↓",
        BatteryStatus::Unknown => " ",
    };
    let (text, style) = match charge {
        Some(c) if c <= low_threshold => (
            format!("{:>3}%", c),
            Style::default()
                .fg(C_BATTERY_LOW)
                .add_modifier(Modifier::REVERSED | Modifier::BOLD),
        ),
        Some(c) => (format!("{:>3}%", c), style_default()),
        None => ("---%".to_string(), style_secondary()),
    };
    vec![
        Span::styled("| Battery ", style_secondary()),
        Span::styled(text, style),
        Span::styled(format!(" {}", arrow), style_default()),
    ]
}

/// Clock on the left, battery right-aligned.
pub fn draw_clock_bar(
    frame: &mut Frame,
    area: Rect,
    now: NaiveDateTime,
    alarm_on: bool,
    battery: Vec<Span<'static>>,
) {
    let width: usize = battery.iter().map(|s| s.width()).sum();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(width as u16 + 1)])
        .split(area);
    let clock = Line::from(Span::styled(format!(" {}", clock_text(now, alarm_on)), style_default()));
    frame.render_widget(Paragraph::new(clock), chunks[0]);
    frame.render_widget(Paragraph::new(Line::from(battery)), chunks[1]);
}
