use super::utils::{color, controls, controls_line};
use super::*;
use crate::app::ContractDetail;
use govcon::domain::{
    allocation_color, format_allocation, format_currency, format_date, format_percentage,
    format_short_date, margin_color, total_allocation, total_monthly_burn, warning_color,
    BurnDirection, ContractBurnRate,
};
use time::OffsetDateTime;

pub fn render_contract_detail_view(frame: &mut Frame, app: &App, body: Rect) {
    let Some(detail) = &app.detail else {
        empty_message(frame, body, " Contract ".into(), "No contract selected");
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(9),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .split(body);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);
    render_summary(frame, top[0], detail);
    match &detail.burn {
        Some(burn) => render_burn(frame, top[1], burn),
        None => empty_message(frame, top[1], " Burn rate ".into(), "Burn rate unavailable"),
    }

    render_assignments(frame, chunks[1], detail);

    frame.render_widget(
        controls(vec![
            controls_line(&[
                ("↑↓", "Select"),
                ("N", "Assign"),
                ("E", "Edit"),
                ("X", "Remove"),
                ("F", "Funding"),
            ]),
            controls_line(&[
                ("a", "Activate"),
                ("c", "Close"),
                ("D", "Delete"),
                ("R", "Reload"),
                ("Esc", "Back"),
            ]),
        ]),
        chunks[2],
    );
}

fn render_summary(frame: &mut Frame, area: Rect, detail: &ContractDetail) {
    let c = &detail.contract;
    let now = OffsetDateTime::now_utc();
    let level = c.funding_warning(now);
    let muted = Style::default().fg(Color::DarkGray);
    let white = Style::default().fg(Color::White);
    let row = |label: &str, value: String, style: Style| {
        Line::from(vec![
            Span::styled(format!("{:<12}", label), muted),
            Span::styled(value, style),
        ])
    };
    let prime = if c.is_prime {
        "Prime".to_string()
    } else if c.prime_contractor.is_empty() {
        "Sub".to_string()
    } else {
        format!("Sub to {}", c.prime_contractor)
    };
    let lines = vec![
        row("Customer", format!("{} · {}", c.customer_name, prime), white),
        row(
            "Type",
            format!("{} · {}", c.contract_type.label(), c.status.label()),
            white,
        ),
        row(
            "Period",
            format!("{} – {}", format_date(c.start_date), format_date(c.end_date)),
            white,
        ),
        row(
            "Value",
            format!(
                "{} funded of {} ({})",
                format_currency(c.funded_value),
                format_currency(c.total_value),
                format_percentage(c.percent_funded())
            ),
            white,
        ),
        row(
            "Warning",
            format!(
                "{} {} · {} days left",
                level.marker(),
                level.label(),
                c.days_remaining(now)
            ),
            Style::default().fg(color(warning_color(level))),
        ),
        row(
            "Notes",
            c.description.clone().unwrap_or_default(),
            muted,
        ),
    ];
    let title = format!("{} · {}", c.contract_number, c.contract_name);
    frame.render_widget(Paragraph::new(lines).block(section_block(&title)), area);
}

fn bar(ratio: f64, width: usize, style: Style) -> Vec<Span<'static>> {
    let filled = ((ratio * width as f64).round() as usize).min(width);
    vec![
        Span::styled("█".repeat(filled), style),
        Span::styled(
            "░".repeat(width - filled),
            Style::default().fg(Color::DarkGray),
        ),
    ]
}

fn render_burn(frame: &mut Frame, area: Rect, burn: &ContractBurnRate) {
    let block = section_block("Burn rate");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let muted = Style::default().fg(Color::DarkGray);
    let white = Style::default().fg(Color::White);
    let bar_width = (inner.width as usize).saturating_sub(26).max(4);
    let (estimated, actual) = burn.burn_bar_ratios();
    let (direction, direction_style) = match burn.burn_direction() {
        BurnDirection::Over => ("over plan", Style::default().fg(Color::Red)),
        BurnDirection::Under => ("under plan", Style::default().fg(Color::Green)),
        BurnDirection::OnPlan => ("on plan", white),
    };
    let level = burn.warning_level();

    let mut estimated_line = vec![Span::styled(format!("{:<10}", "Estimated"), muted)];
    estimated_line.extend(bar(estimated, bar_width, Style::default().fg(Color::Blue)));
    estimated_line.push(Span::styled(
        format!(" {}", format_currency(burn.estimated_monthly_burn)),
        white,
    ));
    let mut actual_line = vec![Span::styled(format!("{:<10}", "Actual"), muted)];
    actual_line.extend(bar(actual, bar_width, direction_style));
    actual_line.push(Span::styled(
        format!(" {}", format_currency(burn.actual_monthly_burn)),
        white,
    ));

    let months = burn
        .months_until_depletion
        .map(|m| format!("{:.1} months", m))
        .unwrap_or_else(|| "—".to_string());
    let lines = vec![
        Line::from(estimated_line),
        Line::from(actual_line),
        Line::from(vec![
            Span::styled(format!("{:<10}", "Delta"), muted),
            Span::styled(
                format!("{} / mo, {}", format_currency(burn.monthly_delta()), direction),
                direction_style,
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<10}", "Remaining"), muted),
            Span::styled(format_currency(burn.funding_remaining()), white),
            Span::styled(
                format!(
                    "  {} used",
                    format_percentage(burn.funding_percentage_used)
                ),
                muted,
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<10}", "Depletes"), muted),
            Span::styled(
                format!(
                    "{} ({})",
                    format_short_date(burn.projected_depletion_date, "—"),
                    months
                ),
                Style::default().fg(color(warning_color(level))),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!("{:<10}", "Funded"), muted),
            Span::styled(format_percentage(burn.funded_share()), white),
            Span::styled(
                format!(" of total · {} resources", burn.assigned_resource_count),
                muted,
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_assignments(frame: &mut Frame, area: Rect, detail: &ContractDetail) {
    let rows_data = &detail.assignments;
    let title = format!(
        " Assigned resources ({}) · {} allocated · {} / mo ",
        rows_data.len(),
        format_allocation(total_allocation(rows_data)),
        format_currency(total_monthly_burn(rows_data))
    );
    if rows_data.is_empty() {
        empty_message(frame, area, title, "No resources assigned. Press n to assign one");
        return;
    }
    let rows: Vec<Row> = rows_data
        .iter()
        .map(|a| {
            let name = if a.is_underwater {
                Span::styled(format!("⚠ {}", a.resource_name), Style::default().fg(Color::Red))
            } else {
                Span::raw(a.resource_name.clone())
            };
            let bill = match a.contract_bill_rate_override {
                Some(_) => format!("{}*", format_currency(a.bill_rate)),
                None => format_currency(a.bill_rate),
            };
            Row::new(vec![
                Cell::from(name),
                Cell::from(a.resource_type.clone()),
                Cell::from(a.lcat_title.clone().unwrap_or_default()),
                Cell::from(Span::styled(
                    format_allocation(a.allocation_percentage),
                    Style::default().fg(color(allocation_color(a.allocation_percentage))),
                )),
                Cell::from(a.annual_hours.normalize().to_string()),
                Cell::from(format_currency(a.burdened_cost)),
                Cell::from(bill),
                Cell::from(Span::styled(
                    format_currency(a.margin),
                    Style::default().fg(color(margin_color(a.margin))),
                )),
                Cell::from(format_currency(a.monthly_burn)),
                Cell::from(format_short_date(a.end_date, "—")),
            ])
        })
        .collect();
    let table = selectable_table(
        vec![
            "Resource", "Type", "LCAT", "Alloc", "Hours", "Cost/hr", "Bill/hr", "Margin",
            "Burn/mo", "Ends",
        ],
        rows,
        vec![
            Constraint::Min(18),
            Constraint::Length(14),
            Constraint::Length(18),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
        utils::titled_block(title),
    );
    let mut state = table_state(detail.selected, rows_data.len());
    frame.render_stateful_widget(table, area, &mut state);
}
