use crate::app::actions::count_by_category;
use crate::app::App;
use crate::ui::widgets::map::category_color;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};
use ratatui::Frame;
use sighting_globe::domain::{format_year, Category, Record};
use sighting_globe::engine::{FilterMode, Ticker, TimelineEngine};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryShare {
    pub category: Category,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsSummary {
    pub heading: String,
    pub total: usize,
    pub shares: Vec<CategoryShare>,
    /// Share of the whole dataset, shown while scrubbing by year.
    pub percent_of_total: Option<u32>,
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Per-category counts with their share rounded to one decimal.
pub fn category_shares<'a, I>(records: I) -> Vec<CategoryShare>
where
    I: IntoIterator<Item = &'a Record>,
{
    let counts = count_by_category(records);
    let total: usize = counts.iter().map(|(_, count)| count).sum();
    counts
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category,
            count,
            percent: (percent(count, total) * 10.0).round() / 10.0,
        })
        .collect()
}

/// Summarises the visible subset, falling back to the whole dataset when
/// the cursor has not reached any dated record yet.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn summarize<T: Ticker>(engine: &TimelineEngine<T>) -> AnalyticsSummary {
    let total_records = engine.records().len();
    let visible = engine.visible_count();

    match engine.mode() {
        FilterMode::Period => AnalyticsSummary {
            heading: "SIGHTINGS IN PERIOD".to_string(),
            total: visible,
            shares: category_shares(engine.visible_records()),
            percent_of_total: None,
        },
        FilterMode::Cursor if visible > 0 => AnalyticsSummary {
            heading: format!("SIGHTINGS BY {}", format_year(engine.current_year())),
            total: visible,
            shares: category_shares(engine.visible_records()),
            percent_of_total: Some(percent(visible, total_records).round() as u32),
        },
        FilterMode::Cursor => AnalyticsSummary {
            heading: "TOTAL SIGHTINGS".to_string(),
            total: total_records,
            shares: category_shares(engine.records()),
            percent_of_total: None,
        },
    }
}

pub fn render_analytics(app: &App, f: &mut Frame<'_>, area: Rect) {
    let summary = summarize(&app.engine);

    let block = Block::default()
        .title(" Analytics ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(inner);

    let mut headline = vec![
        Span::styled(
            format!("{} ", summary.total),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(summary.heading.clone(), Style::default().fg(Color::Cyan)),
    ];
    if let Some(share) = summary.percent_of_total {
        headline.push(Span::styled(
            format!("  {share}% of total sightings"),
            Style::default().fg(Color::Gray),
        ));
    }
    f.render_widget(Paragraph::new(Text::from(TextLine::from(headline))), rows[0]);

    let bars: Vec<Bar<'_>> = summary
        .shares
        .iter()
        .map(|share| {
            let color = category_color(share.category);
            Bar::default()
                .value(u64::try_from(share.count).unwrap_or(u64::MAX))
                .label(TextLine::from(format!("{:<9}", share.category.label())))
                .text_value(format!("{} ({:.1}%)", share.count, share.percent))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, rows[1]);
}
