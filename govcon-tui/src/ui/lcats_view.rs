use super::contracts_view::render_search_box;
use super::utils::{controls, controls_line};
use super::*;
use govcon::domain::{format_currency, Lcat};
use rust_decimal::Decimal;

pub fn render_lcats_view(frame: &mut Frame, app: &App, body: Rect) {
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

    let lcats = app.visible_lcats();
    let title = if app.pending_lcat_rates.is_empty() {
        format!(" Labor categories ({}) ", lcats.len())
    } else {
        format!(
            " Labor categories ({}) · {} staged ",
            lcats.len(),
            app.pending_lcat_rates.len()
        )
    };
    if lcats.is_empty() {
        let message = if app.lcats.is_empty() {
            "No LCATs. Press n to create one"
        } else {
            "No LCATs match the search"
        };
        empty_message(frame, chunks[1], title, message);
    } else {
        let rows: Vec<Row> = lcats.iter().map(|l| lcat_row(app, l)).collect();
        let table = selectable_table(
            vec!["Name", "Published", "Default bill", "Titles", "Status"],
            rows,
            vec![
                Constraint::Length(24),
                Constraint::Length(12),
                Constraint::Length(13),
                Constraint::Min(20),
                Constraint::Length(9),
            ],
            utils::titled_block(title),
        );
        let mut state = table_state(app.lcat_index, lcats.len());
        frame.render_stateful_widget(table, chunks[1], &mut state);
    }

    frame.render_widget(
        controls(vec![controls_line(&[
            ("↑↓", "Select"),
            ("/", "Search"),
            ("N", "New"),
            ("P", "Stage rates"),
            ("S", "Save"),
            ("U", "Discard"),
            ("R", "Reload"),
        ])]),
        chunks[2],
    );
}

/// Current rate, or the staged one in magenta with a trailing `*`.
fn rate_cell<'a>(current: Option<Decimal>, staged: Option<Decimal>) -> Cell<'a> {
    match staged {
        Some(rate) => Cell::from(Span::styled(
            format!("{}*", format_currency(rate)),
            Style::default().fg(Color::Magenta),
        )),
        None => Cell::from(
            current
                .map(format_currency)
                .unwrap_or_else(|| "—".to_string()),
        ),
    }
}

fn lcat_row<'a>(app: &App, lcat: &Lcat) -> Row<'a> {
    let pending = app.pending_lcat_rates.get(&lcat.id);
    let status = if lcat.is_active {
        Span::styled("Active", Style::default().fg(Color::Green))
    } else {
        Span::styled("Inactive", Style::default().fg(Color::DarkGray))
    };
    Row::new(vec![
        Cell::from(lcat.name.clone()),
        rate_cell(
            lcat.current_published_rate,
            pending.and_then(|p| p.published_rate),
        ),
        rate_cell(
            lcat.current_default_bill_rate,
            pending.and_then(|p| p.default_bill_rate),
        ),
        Cell::from(lcat.position_titles.join(", ")),
        Cell::from(status),
    ])
}
