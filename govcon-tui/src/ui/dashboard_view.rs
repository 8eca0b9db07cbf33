use super::utils::{color, controls, controls_line, ratio};
use super::*;
use crate::app::DashboardTab;
use govcon::domain::{
    format_currency, format_percentage, format_short_date, health_color, severity_color,
    urgent_alerts, warning_color, CompleteDashboard, ContractStatus, FinancialProjections,
};

/// Shared color palette for pie slices and legends
pub const PALETTE: [Color; 12] = [
    Color::Green,
    Color::Yellow,
    Color::DarkGray,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::Red,
    Color::LightBlue,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightMagenta,
    Color::LightCyan,
];

pub fn render_dashboard_view(frame: &mut Frame, app: &App, body: Rect) {
    let urgent_rows = app
        .dashboard
        .data
        .as_ref()
        .map_or(0, |d| urgent_alerts(&d.alerts).len() as u16);
    let alert_height = if urgent_rows > 0 { urgent_rows + 2 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(alert_height),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(body);

    render_tab_line(frame, chunks[0], app);

    let controls_bar = controls(vec![controls_line(&[
        ("Tab/←→", "Switch tab"),
        ("R", "Refresh"),
        ("A", "Auto-refresh"),
        ("1-5", "Views"),
        ("Q", "Quit"),
    ])]);
    frame.render_widget(controls_bar, chunks[3]);

    let Some(data) = &app.dashboard.data else {
        let (message, style) = match &app.dashboard.error {
            Some(err) => (err.as_str(), Style::default().fg(Color::Red)),
            None => ("Loading dashboard…", Style::default().fg(Color::DarkGray)),
        };
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(style)
            .block(utils::titled_block(" Dashboard ".to_string()));
        frame.render_widget(paragraph, chunks[2]);
        return;
    };

    if alert_height > 0 {
        render_alert_strip(frame, chunks[1], data);
    }

    match app.dashboard.tab {
        DashboardTab::Overview => render_overview(frame, chunks[2], data),
        DashboardTab::Contracts => render_contract_health(frame, chunks[2], data),
        DashboardTab::Resources => render_utilization(frame, chunks[2], data),
        DashboardTab::Projections => match &app.dashboard.projections {
            Some(projections) => render_projections(frame, chunks[2], projections),
            None => empty_message(frame, chunks[2], " Projections ".into(), "No projections"),
        },
    }
}

fn render_tab_line(frame: &mut Frame, area: Rect, app: &App) {
    let muted = Style::default().fg(Color::DarkGray);
    let mut spans = vec![Span::raw(" ")];
    for tab in DashboardTab::ALL {
        let style = if tab == app.dashboard.tab {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!(" {} ", tab.label()), style));
        spans.push(Span::raw(" "));
    }

    spans.push(Span::styled(" | ", muted));
    if app.dashboard.auto_refresh {
        spans.push(Span::styled(
            format!("auto {}s", app.refresh_interval.as_secs()),
            Style::default().fg(Color::Green),
        ));
    } else {
        spans.push(Span::styled("auto off", muted));
    }
    if let Some(at) = app.dashboard.last_loaded {
        spans.push(Span::styled(
            format!("  updated {}s ago", at.elapsed().as_secs()),
            muted,
        ));
    }
    if let (Some(err), Some(_)) = (&app.dashboard.error, &app.dashboard.data) {
        spans.push(Span::styled(format!("  {}", err), Style::default().fg(Color::Red)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_alert_strip(frame: &mut Frame, area: Rect, data: &CompleteDashboard) {
    let lines: Vec<Line> = urgent_alerts(&data.alerts)
        .into_iter()
        .map(|alert| {
            let c = color(severity_color(alert.severity));
            Line::from(vec![
                Span::styled(format!("{:?} ", alert.severity), Style::default().fg(c)),
                Span::styled(alert.title.clone(), Style::default().fg(Color::White)),
                Span::styled(
                    format!(" · {}", alert.message),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(Span::styled(" Urgent ", Style::default().fg(Color::Red)))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(paragraph, area);
}

fn metric_line(label: &str, value: String, value_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<22}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, value_style),
    ])
}

fn render_overview(frame: &mut Frame, area: Rect, data: &CompleteDashboard) {
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let m = &data.metrics;
    let white = Style::default().fg(Color::White);
    let health_style = Style::default()
        .fg(color(health_color(m.overall_health)))
        .add_modifier(Modifier::BOLD);
    let profit_style = if m.projected_monthly_profit < rust_decimal::Decimal::ZERO {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    let lines = vec![
        metric_line("Portfolio health", format!("{:?}", m.overall_health), health_style),
        Line::from(""),
        metric_line("Total contract value", format_currency(m.total_contract_value), white),
        metric_line("Total funded", format_currency(m.total_funded_value), white),
        metric_line("Total burned", format_currency(m.total_burned_amount), white),
        metric_line("Monthly burn", format_currency(m.monthly_burn_rate), white),
        metric_line("Quarterly burn", format_currency(m.quarterly_burn_rate), white),
        Line::from(""),
        metric_line(
            "Projected revenue / mo",
            format_currency(m.projected_monthly_revenue),
            white,
        ),
        metric_line(
            "Projected profit / mo",
            format_currency(m.projected_monthly_profit),
            profit_style,
        ),
        Line::from(""),
        metric_line(
            "Critical / warning",
            format!("{} / {}", m.critical_contracts, m.warning_contracts),
            Style::default().fg(Color::Yellow),
        ),
    ];

    let block = section_block("Portfolio");
    let inner = block.inner(panels[0]);
    frame.render_widget(block, panels[0]);
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);
    frame.render_widget(Paragraph::new(lines), split[0]);

    let gauge = ratatui::widgets::LineGauge::default()
        .ratio(ratio(m.funded_ratio()))
        .label(format!("Funded {}", format_percentage(m.funded_ratio())))
        .filled_symbol(ratatui::symbols::line::THICK_HORIZONTAL)
        .unfilled_symbol("╌")
        .filled_style(Style::default().fg(Color::Cyan))
        .unfilled_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(gauge, split[1]);

    render_status_pie(frame, panels[1], data);
}

fn render_status_pie(frame: &mut Frame, area: Rect, data: &CompleteDashboard) {
    use tui_piechart::{PieChart, PieSlice};

    let block = section_block("Contracts by status");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let distribution = data.metrics.status_distribution();
    let total: u32 = distribution.iter().map(|(_, n)| n).sum();
    if total == 0 {
        let empty = Paragraph::new("No contracts")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let slice_color = |status: ContractStatus| match status {
        ContractStatus::Active => PALETTE[0],
        ContractStatus::Draft => PALETTE[1],
        ContractStatus::Closed => PALETTE[2],
    };

    let labels: Vec<String> = distribution
        .iter()
        .map(|(status, n)| format!("{}: {}", status.label(), n))
        .collect();
    let slices: Vec<PieSlice> = distribution
        .iter()
        .zip(labels.iter())
        .filter(|((_, n), _)| *n > 0)
        .map(|((status, n), label)| {
            PieSlice::new(label.as_str(), f64::from(*n), slice_color(*status))
        })
        .collect();

    let legend_rows = distribution.len() as u16 + 1;
    let pie_height = (inner.width / 2)
        .min(inner.height.saturating_sub(legend_rows))
        .max(1);
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(pie_height), Constraint::Min(0)])
        .split(inner);

    let pie = PieChart::new(slices)
        .show_legend(false)
        .show_percentages(false);
    frame.render_widget(pie, split[0]);

    let legend: Vec<Line> = distribution
        .iter()
        .map(|(status, n)| {
            let pct = f64::from(*n) / f64::from(total) * 100.0;
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(slice_color(*status))),
                Span::styled(
                    format!("{} — {} ({:.0}%)", status.label(), n, pct),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();
    let legend = Paragraph::new(legend)
        .alignment(Alignment::Center)
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(legend, split[1]);
}

fn render_contract_health(frame: &mut Frame, area: Rect, data: &CompleteDashboard) {
    if data.contracts.is_empty() {
        empty_message(frame, area, " Contract health ".into(), "No contracts");
        return;
    }
    let rows: Vec<Row> = data
        .contracts
        .iter()
        .map(|card| {
            let level = color(warning_color(card.warning_level));
            let alerts = card.alert_preview().join("; ");
            Row::new(vec![
                Cell::from(card.contract_number.clone()),
                Cell::from(card.customer_name.clone()),
                Cell::from(Span::styled(
                    format!("{} {}", card.warning_level.marker(), card.warning_level.label()),
                    Style::default().fg(level),
                )),
                Cell::from(format_currency(card.funded_value)),
                Cell::from(format_percentage(card.burned_ratio())),
                Cell::from(format_currency(card.monthly_burn_rate)),
                Cell::from(format!("{:.1}", card.months_until_depletion)),
                Cell::from(format_short_date(card.projected_depletion_date, "—")),
                Cell::from(card.resource_count.to_string()),
                Cell::from(format!("{} {}", card.trend.marker(), format_percentage(card.profit_margin))),
                Cell::from(Span::styled(alerts, Style::default().fg(Color::DarkGray))),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Length(13),
            Constraint::Length(7),
            Constraint::Length(11),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(4),
            Constraint::Length(9),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new([
            "Contract", "Customer", "Funding", "Funded", "Burned", "Burn/mo", "Mo.", "Depletes",
            "Res", "Margin", "Alerts",
        ])
        .style(Style::default().fg(Color::Yellow))
        .bottom_margin(1),
    )
    .block(section_block("Contract health"));
    frame.render_widget(table, area);
}

fn render_utilization(frame: &mut Frame, area: Rect, data: &CompleteDashboard) {
    let r = &data.resources;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(r.metrics_by_type.len() as u16 + 4),
            Constraint::Min(3),
        ])
        .split(area);

    let white = Style::default().fg(Color::White);
    let muted = Style::default().fg(Color::DarkGray);
    let summary = Line::from(vec![
        Span::styled("Total ", muted),
        Span::styled(r.total_resources.to_string(), white),
        Span::styled("  Active ", muted),
        Span::styled(r.active_resources.to_string(), white),
        Span::styled("  Bench ", muted),
        Span::styled(r.bench_resources.to_string(), white),
        Span::styled("  Underwater ", muted),
        Span::styled(
            r.underwater_resources.to_string(),
            if r.underwater_resources > 0 {
                Style::default().fg(Color::Red)
            } else {
                white
            },
        ),
        Span::styled("  Avg utilization ", muted),
        Span::styled(format_percentage(r.average_utilization), white),
        Span::styled("  Cost/mo ", muted),
        Span::styled(format_currency(r.total_monthly_cost), white),
        Span::styled("  Revenue/mo ", muted),
        Span::styled(format_currency(r.total_monthly_revenue), white),
    ]);
    frame.render_widget(
        Paragraph::new(summary).block(section_block("Utilization")),
        chunks[0],
    );

    let type_rows: Vec<Row> = r
        .metrics_by_type
        .values()
        .map(|t| {
            Row::new(vec![
                t.resource_type.clone(),
                t.count.to_string(),
                format_currency(t.average_cost),
                format_currency(t.average_revenue),
                format_currency(t.average_margin),
                format_percentage(t.utilization_percentage),
            ])
        })
        .collect();
    let types = Table::new(
        type_rows,
        [
            Constraint::Length(16),
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Min(8),
        ],
    )
    .header(
        Row::new(["Type", "Count", "Avg cost", "Avg revenue", "Avg margin", "Utilized"])
            .style(Style::default().fg(Color::Yellow)),
    )
    .block(section_block("By type"));
    frame.render_widget(types, chunks[1]);

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    let allocation_lines = |rows: &[govcon::domain::ResourceAllocation]| -> Vec<Line<'static>> {
        if rows.is_empty() {
            return vec![Line::from(Span::styled("None", muted))];
        }
        rows.iter()
            .map(|a| {
                let name_style = if a.is_underwater {
                    Style::default().fg(Color::Red)
                } else {
                    white
                };
                Line::from(vec![
                    Span::styled(format!("{:<20}", a.resource_name), name_style),
                    Span::styled(
                        format!(
                            " {:>6}  {} contract(s)",
                            format_percentage(a.total_allocation),
                            a.contract_count
                        ),
                        muted,
                    ),
                ])
            })
            .collect()
    };
    frame.render_widget(
        Paragraph::new(allocation_lines(&r.top_utilized_resources))
            .block(section_block("Most utilized")),
        lists[0],
    );
    frame.render_widget(
        Paragraph::new(allocation_lines(&r.underutilized_resources))
            .block(section_block("Underutilized")),
        lists[1],
    );
}

fn render_projections(frame: &mut Frame, area: Rect, projections: &FinancialProjections) {
    let depletion = projections.depletion_preview();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(depletion.len() as u16 + 4),
        ])
        .split(area);

    let muted = Style::default().fg(Color::DarkGray);
    let white = Style::default().fg(Color::White);
    let totals = Line::from(vec![
        Span::styled(format!("{} months  ", projections.months_projected), muted),
        Span::styled("Revenue ", muted),
        Span::styled(format_currency(projections.total_projected_revenue), white),
        Span::styled("  Cost ", muted),
        Span::styled(format_currency(projections.total_projected_cost), white),
        Span::styled("  Profit ", muted),
        Span::styled(format_currency(projections.total_projected_profit), white),
    ]);
    frame.render_widget(
        Paragraph::new(totals).block(section_block("Projections")),
        chunks[0],
    );

    let rows: Vec<Row> = projections
        .projections
        .iter()
        .map(|p| {
            let expiring = p.expiring_contracts.join(", ");
            Row::new(vec![
                Cell::from(p.month.clone()),
                Cell::from(format_currency(p.projected_revenue)),
                Cell::from(format_currency(p.projected_cost)),
                Cell::from(format_currency(p.projected_profit)),
                Cell::from(p.active_contract_count.to_string()),
                Cell::from(Span::styled(expiring, Style::default().fg(Color::Yellow))),
            ])
        })
        .collect();
    let monthly = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Length(7),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(["Month", "Revenue", "Cost", "Profit", "Active", "Expiring"])
            .style(Style::default().fg(Color::Yellow)),
    )
    .block(section_block("Monthly"));
    frame.render_widget(monthly, chunks[1]);

    let depletion_rows: Vec<Row> = depletion
        .iter()
        .map(|d| {
            let severity_style = match d.impact_severity.as_str() {
                "Critical" => Style::default().fg(Color::Red),
                "High" => Style::default().fg(Color::LightRed),
                _ => Style::default().fg(Color::Yellow),
            };
            Row::new(vec![
                Cell::from(d.contract_number.clone()),
                Cell::from(format_short_date(Some(d.estimated_depletion_date), "—")),
                Cell::from(format_currency(d.remaining_funds)),
                Cell::from(d.days_until_depletion.to_string()),
                Cell::from(Span::styled(d.impact_severity.clone(), severity_style)),
            ])
        })
        .collect();
    let schedule = Table::new(
        depletion_rows,
        [
            Constraint::Length(18),
            Constraint::Length(10),
            Constraint::Length(13),
            Constraint::Length(6),
            Constraint::Min(8),
        ],
    )
    .header(
        Row::new(["Contract", "Depletes", "Remaining", "Days", "Impact"])
            .style(Style::default().fg(Color::Yellow)),
    )
    .block(section_block("Depletion schedule"));
    frame.render_widget(schedule, chunks[2]);
}
