use super::utils::{color, controls, controls_line};
use super::*;
use govcon::domain::{format_currency, margin_color, Resource};

pub fn render_resources_view(frame: &mut Frame, app: &App, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(body);

    frame.render_widget(Paragraph::new(filter_line(app)), chunks[0]);

    let resources = app.visible_resources();
    let title = format!(" Resources ({}) ", resources.len());
    if resources.is_empty() {
        let message = if app.underwater_only {
            "No underwater resources"
        } else {
            "No resources match the filters"
        };
        empty_message(frame, chunks[1], title, message);
    } else {
        let rows: Vec<Row> = resources.iter().map(|r| resource_row(app, r)).collect();
        let table = selectable_table(
            vec![
                "Name", "Type", "LCAT", "Contract", "Pay/hr", "Cost/hr", "Bill/hr", "Margin",
                "Status",
            ],
            rows,
            vec![
                Constraint::Min(18),
                Constraint::Length(5),
                Constraint::Length(18),
                Constraint::Length(16),
                Constraint::Length(10),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(9),
            ],
            utils::titled_block(title),
        );
        let mut state = table_state(app.resource_index, resources.len());
        frame.render_stateful_widget(table, chunks[1], &mut state);
    }

    frame.render_widget(
        controls(vec![
            controls_line(&[
                ("↑↓", "Select"),
                ("N", "New"),
                ("E", "Edit"),
                ("T", "Terminate"),
                ("C", "Cost analysis"),
            ]),
            controls_line(&[
                ("F", "Type"),
                ("V", "Active"),
                ("W", "Underwater"),
                ("P", "Stage rate"),
                ("S", "Save"),
                ("U", "Discard"),
            ]),
        ]),
        chunks[2],
    );
}

fn filter_line(app: &App) -> Line<'static> {
    let muted = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);
    let filters = &app.resource_filters;
    let resource_type = filters
        .resource_type
        .map(|t| t.label().to_string())
        .unwrap_or_else(|| "All".to_string());
    let active = match filters.is_active {
        Some(true) => "Active",
        Some(false) => "Inactive",
        None => "All",
    };
    let mut spans = vec![
        Span::styled("Type ", muted),
        Span::styled(resource_type, value),
        Span::styled("  Status ", muted),
        Span::styled(active, value),
    ];
    if app.underwater_only {
        spans.push(Span::styled("  Underwater only", Style::default().fg(Color::Red)));
    }
    if !app.pending_resource_rates.is_empty() {
        spans.push(Span::styled(
            format!("  {} staged", app.pending_resource_rates.len()),
            Style::default().fg(Color::Magenta),
        ));
    }
    Line::from(spans)
}

fn resource_row<'a>(app: &App, r: &Resource) -> Row<'a> {
    let pending = app
        .pending_resource_rates
        .get(&r.id)
        .and_then(|p| p.hourly_rate);
    let name = if r.is_underwater() {
        Span::styled(format!("⚠ {}", r.full_name), Style::default().fg(Color::Red))
    } else {
        Span::raw(r.full_name.clone())
    };
    let pay = match pending {
        Some(rate) => Span::styled(
            format!("{}*", format_currency(rate)),
            Style::default().fg(Color::Magenta),
        ),
        None => Span::raw(format_currency(r.hourly_rate)),
    };
    let margin = match r.computed_margin() {
        Some(m) => Span::styled(
            format_currency(m),
            Style::default().fg(color(margin_color(m))),
        ),
        None => Span::styled("—", Style::default().fg(Color::DarkGray)),
    };
    let status = if r.is_active {
        Span::styled("Active", Style::default().fg(Color::Green))
    } else {
        Span::styled("Inactive", Style::default().fg(Color::DarkGray))
    };
    Row::new(vec![
        Cell::from(name),
        Cell::from(r.resource_type.label()),
        Cell::from(r.lcat_name.clone().unwrap_or_default()),
        Cell::from(r.contract_name.clone().unwrap_or_default()),
        Cell::from(pay),
        Cell::from(format_currency(r.burdened_cost)),
        Cell::from(
            r.bill_rate
                .map(format_currency)
                .unwrap_or_else(|| "—".to_string()),
        ),
        Cell::from(margin),
        Cell::from(status),
    ])
}
