use crate::app::App;
use crate::ui::screens::globe::render_globe;
use crate::ui::widgets::map::category_color;
use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;
use sighting_globe::domain::Record;

/// Highest credibility score a record can carry.
const MAX_CREDIBILITY: u8 = 10;

pub fn render_details(app: &App, f: &mut Frame<'_>) {
    render_globe(app, f);

    let Some(record) = app.selected_record() else {
        return;
    };

    let popup = centered_rect(70, 70, f.area());
    f.render_widget(ClearWidget, popup);

    let color = category_color(record.category);
    let block = Block::default()
        .title(format!(" {} ", record.title))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Min(2),
            Constraint::Length(1),
        ])
        .split(inner);

    f.render_widget(Paragraph::new(Text::from(fact_lines(record))), rows[0]);
    render_credibility(record, f, rows[1]);
    f.render_widget(
        Paragraph::new(record.description.as_str())
            .block(Block::default().borders(Borders::TOP).title(" Report "))
            .wrap(Wrap { trim: true }),
        rows[2],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            "Esc: Close | ↑/↓: Previous/Next",
            Style::default().fg(Color::Gray),
        )),
        rows[3],
    );
}

fn fact_lines(record: &Record) -> Vec<TextLine<'static>> {
    let label_style = Style::default().fg(Color::Gray);
    let value_style = Style::default().fg(Color::White);
    let fact = |label: &str, value: String| {
        TextLine::from(vec![
            Span::styled(format!("{label:<12}"), label_style),
            Span::styled(value, value_style),
        ])
    };

    let date = if record.date.is_empty() {
        "Unknown date".to_string()
    } else {
        record.date.clone()
    };

    vec![
        fact("Date", date),
        TextLine::from(vec![
            Span::styled(format!("{:<12}", "Category"), label_style),
            Span::styled(
                record.category.label(),
                Style::default()
                    .fg(category_color(record.category))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        fact("Place", record.place_line()),
        fact(
            "Coordinates",
            format!("{:.3}, {:.3}", record.position.lat, record.position.lng),
        ),
        fact("Record", record.id.clone()),
    ]
}

fn render_credibility(record: &Record, f: &mut Frame<'_>, area: Rect) {
    let score = record.credibility.min(MAX_CREDIBILITY);
    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(category_color(record.category))
                .bg(Color::Black),
        )
        .ratio(f64::from(score) / f64::from(MAX_CREDIBILITY))
        .label(format!("Credibility {score}/{MAX_CREDIBILITY}"));
    f.render_widget(gauge, area);
}
