use govcon::domain::DisplayColor;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Helper function to create a centered rectangle
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height.saturating_sub(height)) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((r.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((r.width.saturating_sub(width)) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn color(c: DisplayColor) -> Color {
    match c {
        DisplayColor::Gray => Color::DarkGray,
        DisplayColor::Green => Color::Green,
        DisplayColor::Yellow => Color::Yellow,
        DisplayColor::Blue => Color::Blue,
        DisplayColor::Orange => Color::LightRed,
        DisplayColor::Red => Color::Red,
    }
}

/// A percentage as a 0..=1 ratio for gauges.
pub fn ratio(percent: Decimal) -> f64 {
    (percent / Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or(0.0)
        .clamp(0.0, 1.0)
}

/// "key: label" pairs in the controls bar style.
pub fn controls_line(pairs: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(pairs.len() * 2);
    for (i, (key, label)) in pairs.iter().enumerate() {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        let sep = if i + 1 == pairs.len() { "" } else { "  " };
        spans.push(Span::raw(format!(": {}{}", label, sep)));
    }
    Line::from(spans)
}

pub fn controls(lines: Vec<Line<'static>>) -> Paragraph<'static> {
    Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " Controls ",
                Style::default().fg(Color::DarkGray),
            ))
            .padding(Padding::horizontal(1)),
    )
}

pub fn titled_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(Span::styled(title, Style::default().fg(Color::White)))
        .padding(Padding::horizontal(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ratio_clamps_out_of_range_percentages() {
        assert_eq!(ratio(dec!(50)), 0.5);
        assert_eq!(ratio(dec!(140)), 1.0);
        assert_eq!(ratio(dec!(-5)), 0.0);
    }

    #[test]
    fn centered_rect_fits_inside_small_areas() {
        let area = Rect::new(0, 0, 20, 10);
        let popup = centered_rect(40, 5, area);
        assert!(popup.width <= area.width);
        assert_eq!(popup.height, 5);
    }
}
