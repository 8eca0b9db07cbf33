use super::utils::{color, controls, controls_line};
use super::*;
use govcon::domain::{format_currency, format_percentage, format_short_date, warning_color};
use time::OffsetDateTime;

pub fn render_contracts_view(frame: &mut Frame, app: &App, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(body);

    render_search_box(frame, chunks[0], app);

    let contracts = app.visible_contracts();
    let title = format!(" Contracts ({}) ", contracts.len());
    if contracts.is_empty() {
        let message = if app.contracts.is_empty() {
            "No contracts. Press n to create one"
        } else {
            "No contracts match the search"
        };
        empty_message(frame, chunks[1], title, message);
    } else {
        let now = OffsetDateTime::now_utc();
        let rows: Vec<Row> = contracts
            .iter()
            .map(|c| {
                let level = c.funding_warning(now);
                let days = c.days_remaining(now);
                let days_style = if days < 0 {
                    Style::default().fg(Color::DarkGray)
                } else if days <= 90 {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(vec![
                    Cell::from(c.contract_number.clone()),
                    Cell::from(c.contract_name.clone()),
                    Cell::from(c.customer_name.clone()),
                    Cell::from(c.contract_type.label()),
                    Cell::from(c.status.label()),
                    Cell::from(format_currency(c.total_value)),
                    Cell::from(format_percentage(c.percent_funded())),
                    Cell::from(Span::styled(
                        format!("{} {}", level.marker(), level.label()),
                        Style::default().fg(color(warning_color(level))),
                    )),
                    Cell::from(format_short_date(Some(c.end_date), "—")),
                    Cell::from(Span::styled(days.to_string(), days_style)),
                ])
            })
            .collect();
        let table = selectable_table(
            vec![
                "Number", "Name", "Customer", "Type", "Status", "Value", "Funded", "Warning",
                "Ends", "Days",
            ],
            rows,
            vec![
                Constraint::Length(18),
                Constraint::Min(16),
                Constraint::Length(16),
                Constraint::Length(11),
                Constraint::Length(7),
                Constraint::Length(13),
                Constraint::Length(7),
                Constraint::Length(11),
                Constraint::Length(10),
                Constraint::Length(5),
            ],
            utils::titled_block(title),
        );
        let mut state = table_state(app.contract_index, contracts.len());
        frame.render_stateful_widget(table, chunks[1], &mut state);
    }

    frame.render_widget(
        controls(vec![controls_line(&[
            ("↑↓", "Select"),
            ("Enter", "Open"),
            ("/", "Search"),
            ("N", "New"),
            ("R", "Reload"),
            ("1-5", "Views"),
            ("Q", "Quit"),
        ])]),
        chunks[2],
    );
}

/// Search box shared by the contracts and LCAT lists.
pub(super) fn render_search_box(frame: &mut Frame, area: Rect, app: &App) {
    let (before, after) = app.search_input.split_at_cursor();
    let border = if app.search_active {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let line = if app.search_input.value.is_empty() && !app.search_active {
        Line::from(Span::styled(
            "Press / to search",
            Style::default().fg(Color::DarkGray),
        ))
    } else if app.search_active {
        Line::from(vec![
            Span::raw(before.to_string()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
            Span::raw(after.to_string()),
        ])
    } else {
        Line::from(Span::raw(app.search_input.value.clone()))
    };
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(Span::styled(" Search ", Style::default().fg(border)))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(paragraph, area);
}
