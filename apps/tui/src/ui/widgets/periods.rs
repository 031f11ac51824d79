use crate::app::App;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Tabs};
use ratatui::Frame;
use sighting_globe::domain::{format_year, Period};

pub fn period_title(period: Period) -> String {
    format!(
        "{} {} ({}–{})",
        period.index() + 1,
        period.label(),
        format_year(period.start()),
        format_year(period.end())
    )
}

pub fn render_period_tabs(app: &App, f: &mut Frame<'_>, area: Rect) {
    let titles = Period::ALL
        .into_iter()
        .map(|period| TextLine::from(period_title(period)))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(" Periods (0 clears) ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .select(app.engine.active_period().map(Period::index))
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Rgb(0, 0, 238))
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));

    f.render_widget(tabs, area);
}
