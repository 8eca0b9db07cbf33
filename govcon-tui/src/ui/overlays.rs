use super::utils::controls_line;
use super::*;

const FORM_WIDTH: u16 = 64;

pub fn render_form(frame: &mut Frame, app: &App) {
    let Some(form) = &app.form else {
        return;
    };
    let label_width = form
        .fields
        .iter()
        .map(|f| f.label.chars().count())
        .max()
        .unwrap_or(0)
        + 2;
    // fields, blank, error, controls, borders
    let height = form.fields.len() as u16 + 5;
    let area = clear_popup(frame, FORM_WIDTH, height);

    let muted = Style::default().fg(Color::DarkGray);
    let mut lines: Vec<Line> = Vec::with_capacity(form.fields.len() + 4);
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focused;
        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            muted
        };
        let mut spans = vec![
            Span::styled(if focused { "▶ " } else { "  " }, label_style),
            Span::styled(format!("{:<width$}", field.label, width = label_width), label_style),
        ];
        if field.is_choice() {
            let style = if focused {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!("◀ {} ▶", field.display()), style));
        } else if focused {
            let (before, after) = field.input.split_at_cursor();
            spans.push(Span::styled(before.to_string(), Style::default().fg(Color::White)));
            spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
            spans.push(Span::styled(after.to_string(), Style::default().fg(Color::White)));
        } else {
            spans.push(Span::styled(
                field.input.value.clone(),
                Style::default().fg(Color::Gray),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(match &form.error {
        Some(error) => Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))),
        None if app.submitting => Line::from(Span::styled("Saving...", muted)),
        None => Line::from(""),
    });
    lines.push(controls_line(&[
        ("Tab", "Next"),
        ("←→", "Choice"),
        ("Enter", "Save"),
        ("Esc", "Cancel"),
    ]));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(Span::styled(
                format!(" {} ", form.title),
                Style::default().fg(Color::Yellow),
            ))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(paragraph, area);
}

pub fn render_confirm(frame: &mut Frame, app: &App) {
    let Some(confirm) = &app.confirm else {
        return;
    };
    let area = clear_popup(frame, 56, 8);
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            confirm.detail.clone(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Yes", Style::default().fg(Color::Red)),
            Span::raw("    "),
            Span::styled("[n] No", Style::default().fg(Color::White)),
        ]),
    ];
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", confirm.title))
                .padding(Padding::horizontal(1)),
        )
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

pub fn render_cost_analysis(frame: &mut Frame, app: &App) {
    let Some(analysis) = &app.cost_analysis else {
        return;
    };
    let key_width = analysis
        .lines
        .iter()
        .map(|(k, _)| k.chars().count())
        .max()
        .unwrap_or(0)
        + 2;
    let max_height = frame.area().height.saturating_sub(4).max(6);
    let height = (analysis.lines.len() as u16 + 4).min(max_height);
    let area = clear_popup(frame, 70, height);

    let mut lines: Vec<Line> = if analysis.lines.is_empty() {
        vec![Line::from(Span::styled(
            "No cost data returned",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        analysis
            .lines
            .iter()
            .map(|(key, value)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<width$}", key, width = key_width),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(value.clone(), Style::default().fg(Color::White)),
                ])
            })
            .collect()
    };
    lines.push(Line::from(""));
    lines.push(controls_line(&[("Esc", "Close")]));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(
                format!(" Cost analysis · {} ", analysis.title),
                Style::default().fg(Color::Cyan),
            ))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(paragraph, area);
}
