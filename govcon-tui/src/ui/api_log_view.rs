use super::utils::{controls, controls_line};
use super::*;
use govcon::{ApiLogEntry, ApiLogKind};
use time::macros::format_description;

const VISIBLE_ENTRIES: usize = 20;

pub fn render_api_log_view(frame: &mut Frame, app: &App, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(body);

    let stats = app.api_log.stats();
    let muted = Style::default().fg(Color::DarkGray);
    let average = stats
        .average_duration
        .map(|d| format!("{}ms", d.as_millis()))
        .unwrap_or_else(|| "—".to_string());
    let error_style = if stats.errors > 0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Calls ", muted),
            Span::styled(stats.total.to_string(), Style::default().fg(Color::White)),
            Span::styled("  Errors ", muted),
            Span::styled(stats.errors.to_string(), error_style),
            Span::styled("  Avg ", muted),
            Span::styled(average, Style::default().fg(Color::White)),
            Span::styled(format!("  {}", app.backend_label), muted),
        ])),
        chunks[0],
    );

    let entries = app.api_log.recent(VISIBLE_ENTRIES);
    let title = format!(" Recent API calls ({}) ", entries.len());
    if entries.is_empty() {
        empty_message(frame, chunks[1], title, "No API calls recorded yet");
    } else {
        let rows: Vec<Row> = entries.iter().map(entry_row).collect();
        let table = Table::new(
            rows,
            [
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(7),
                Constraint::Min(30),
                Constraint::Length(6),
                Constraint::Length(8),
            ],
        )
        .header(
            Row::new(vec!["Time", "Kind", "Method", "URL", "Status", "Took"])
                .style(Style::default().fg(Color::Yellow))
                .bottom_margin(1),
        )
        .block(utils::titled_block(title));
        frame.render_widget(table, chunks[1]);
    }

    frame.render_widget(
        controls(vec![controls_line(&[
            ("C", "Clear"),
            ("Esc", "Dashboard"),
            ("1-5", "Views"),
            ("Q", "Quit"),
        ])]),
        chunks[2],
    );
}

fn entry_row(entry: &ApiLogEntry) -> Row<'static> {
    let (kind, kind_color) = match entry.kind {
        ApiLogKind::Request => ("request", Color::Blue),
        ApiLogKind::Response => ("response", Color::Green),
        ApiLogKind::Error => ("error", Color::Red),
    };
    let time = entry
        .timestamp
        .format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_default();
    let url = match &entry.error {
        Some(error) => format!("{} · {}", entry.url, error),
        None => entry.url.clone(),
    };
    Row::new(vec![
        Cell::from(Span::styled(time, Style::default().fg(Color::DarkGray))),
        Cell::from(Span::styled(kind, Style::default().fg(kind_color))),
        Cell::from(entry.method.clone()),
        Cell::from(url),
        Cell::from(entry.status.map(|s| s.to_string()).unwrap_or_default()),
        Cell::from(
            entry
                .duration
                .map(|d| format!("{}ms", d.as_millis()))
                .unwrap_or_default(),
        ),
    ])
}
