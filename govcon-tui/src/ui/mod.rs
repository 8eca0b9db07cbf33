use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Padding, Paragraph, Row, Table, TableState},
    Frame,
};

mod api_log_view;
mod contract_detail_view;
mod contracts_view;
mod dashboard_view;
mod lcats_view;
mod overlays;
mod resources_view;
pub(super) mod utils;

pub fn render(frame: &mut Frame, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_top_bar(frame, root[0], app);

    let body = root[1];
    match app.current_view {
        View::Dashboard => dashboard_view::render_dashboard_view(frame, app, body),
        View::Contracts => contracts_view::render_contracts_view(frame, app, body),
        View::ContractDetail => contract_detail_view::render_contract_detail_view(frame, app, body),
        View::Resources => resources_view::render_resources_view(frame, app, body),
        View::Lcats => lcats_view::render_lcats_view(frame, app, body),
        View::ApiLog => api_log_view::render_api_log_view(frame, app, body),
    }

    render_status_line(frame, root[2], app);

    // Overlays render on top of any view, topmost last.
    if app.cost_analysis.is_some() {
        overlays::render_cost_analysis(frame, app);
    }
    if app.form.is_some() {
        overlays::render_form(frame, app);
    }
    if app.confirm.is_some() {
        overlays::render_confirm(frame, app);
    }
}

fn render_top_bar(frame: &mut Frame, area: Rect, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);
    let content_row = rows[1];
    let area = Rect {
        x: content_row.x + 2,
        y: content_row.y,
        width: content_row.width.saturating_sub(4),
        height: content_row.height,
    };

    const LABEL: &str = " GovCon Finance";
    let title_width = 1 + LABEL.len() as u16 + 1;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(title_width), Constraint::Min(10)])
        .split(area);

    let throbber_area = Rect {
        x: cols[0].x + 1,
        y: cols[0].y,
        width: 1,
        height: 1,
    };
    let label_area = Rect {
        x: throbber_area.x + 1,
        y: cols[0].y,
        width: cols[0].width.saturating_sub(2),
        height: 1,
    };
    let throbber = throbber_widgets_tui::Throbber::default()
        .style(Style::default().fg(Color::Yellow))
        .throbber_style(Style::default().fg(Color::Yellow))
        .throbber_set(throbber_widgets_tui::BRAILLE_SIX)
        .use_type(if app.is_loading {
            throbber_widgets_tui::WhichUse::Spin
        } else {
            throbber_widgets_tui::WhichUse::Full
        });
    frame.render_stateful_widget(throbber, throbber_area, &mut app.throbber_state);
    frame.render_widget(
        Paragraph::new(Span::styled(LABEL, Style::default().fg(Color::Yellow))),
        label_area,
    );

    let muted = Style::default().fg(Color::DarkGray);
    let tabs = [
        ("1", View::Dashboard),
        ("2", View::Contracts),
        ("3", View::Resources),
        ("4", View::Lcats),
        ("5", View::ApiLog),
    ];
    let mut spans = Vec::new();
    for (key, view) in tabs {
        let active = app.current_view == view
            || (view == View::Contracts && app.current_view == View::ContractDetail);
        spans.push(Span::styled(format!(" {} ", key), muted));
        let style = if active {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            muted
        };
        spans.push(Span::styled(view.title(), style));
    }
    let pending = app.pending_resource_rates.len() + app.pending_lcat_rates.len();
    if pending > 0 {
        spans.push(Span::styled(" | ", muted));
        spans.push(Span::styled(
            format!("{} pending", pending),
            Style::default().fg(Color::Magenta),
        ));
    }
    spans.push(Span::styled(" | ", muted));
    spans.push(Span::styled(app.backend_label.clone(), muted));
    frame.render_widget(Paragraph::new(Line::from(spans)), cols[1]);
}

fn render_status_line(frame: &mut Frame, area: Rect, app: &App) {
    let Some(message) = &app.status_message else {
        return;
    };
    let line = Line::from(Span::styled(
        format!("  {}", message),
        Style::default().fg(Color::Yellow),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Table rows get a highlighted background when selected; the state keeps the
/// selection scrolled into view.
fn selectable_table<'a>(
    header: Vec<&'a str>,
    rows: Vec<Row<'a>>,
    widths: Vec<Constraint>,
    block: Block<'a>,
) -> Table<'a> {
    Table::new(rows, widths)
        .header(
            Row::new(header.into_iter().map(Cell::from))
                .style(Style::default().fg(Color::Yellow))
                .bottom_margin(1),
        )
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ")
}

fn table_state(selected: usize, len: usize) -> TableState {
    let mut state = TableState::default();
    if len > 0 {
        state.select(Some(selected.min(len - 1)));
    }
    state
}

fn empty_message(frame: &mut Frame, area: Rect, title: String, message: &str) {
    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(utils::titled_block(title));
    frame.render_widget(paragraph, area);
}

fn section_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(Color::White),
        ))
        .padding(Padding::horizontal(1))
}

fn clear_popup(frame: &mut Frame, width: u16, height: u16) -> Rect {
    let area = utils::centered_rect(width, height, frame.area());
    frame.render_widget(Clear, area);
    area
}
