use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, LineGauge, Paragraph};
use ratatui::Frame;
use sighting_globe::domain::format_year;
use sighting_globe::engine::YearBounds;

pub const TICK_COUNT: usize = 5;

/// Position of `year` along the bounds, from 0.0 to 1.0.
#[allow(clippy::cast_precision_loss)]
pub fn timeline_ratio(bounds: YearBounds, year: i32) -> f64 {
    let span = bounds.span();
    if span <= 0 {
        return 1.0;
    }
    let offset = i64::from(year) - i64::from(bounds.min);
    (offset as f64 / span as f64).clamp(0.0, 1.0)
}

/// Evenly spaced years from `min` to `max` for the slider labels.
pub fn tick_years(bounds: YearBounds) -> [i32; TICK_COUNT] {
    let span = bounds.span();
    let mut ticks = [bounds.min; TICK_COUNT];
    for (i, tick) in ticks.iter_mut().enumerate() {
        let step = i64::try_from(i).unwrap_or(0);
        let year = i64::from(bounds.min) + span * step / (TICK_COUNT as i64 - 1);
        *tick = i32::try_from(year).unwrap_or(bounds.max);
    }
    ticks
}

/// Lays the tick labels out across `width` columns.
pub fn tick_label_line(bounds: YearBounds, width: usize) -> String {
    let mut line = vec![' '; width];
    let last = TICK_COUNT - 1;
    for (i, year) in tick_years(bounds).into_iter().enumerate() {
        let label: Vec<char> = format_year(year).chars().collect();
        if label.len() > width {
            continue;
        }
        let anchor = width.saturating_sub(1) * i / last;
        let start = if i == 0 {
            0
        } else if i == last {
            width - label.len()
        } else {
            anchor.saturating_sub(label.len() / 2)
        }
        .min(width - label.len());
        // Skip labels that would overwrite a neighbour
        let free = line[start..start + label.len()].iter().all(|c| *c == ' ')
            && (start == 0 || line[start - 1] == ' ');
        if free {
            line[start..start + label.len()].copy_from_slice(&label);
        }
    }
    line.into_iter().collect()
}

pub fn render_timeline(app: &App, f: &mut Frame<'_>, area: Rect) {
    let engine = &app.engine;
    let block = Block::default()
        .title(" Timeline ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(bounds) = engine.bounds() else {
        let paragraph = Paragraph::new(format!(
            "No dated sightings; showing all {}",
            engine.records().len()
        ))
        .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, inner);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let cursor = engine.current_year();
    let in_period = engine.active_period().is_some();
    let gauge_color = if in_period {
        Color::DarkGray
    } else {
        Color::Magenta
    };

    let gauge = LineGauge::default()
        .ratio(timeline_ratio(bounds, cursor))
        .label(Span::styled(
            format!("{:>9} ", format_year(cursor)),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
        .filled_style(Style::default().fg(gauge_color))
        .unfilled_style(Style::default().fg(Color::DarkGray));
    f.render_widget(gauge, rows[0]);

    let labels = tick_label_line(bounds, usize::from(rows[1].width));
    f.render_widget(
        Paragraph::new(labels).style(Style::default().fg(Color::Gray)),
        rows[1],
    );

    f.render_widget(Paragraph::new(playback_line(app)), rows[2]);
}

fn playback_line(app: &App) -> TextLine<'static> {
    let engine = &app.engine;
    let (icon, state, color) = if engine.is_playing() {
        ("▶", "Playing", Color::Green)
    } else {
        ("⏸", "Paused", Color::Yellow)
    };

    let mut spans = vec![
        Span::styled(
            format!("{icon} {state}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  speed {}x", engine.speed_multiplier()),
            Style::default().fg(Color::White),
        ),
    ];

    if let Some(params) = engine.playback_params() {
        spans.push(Span::styled(
            format!(
                "  +{}y / {}ms",
                params.year_increment,
                params.tick_interval.as_millis()
            ),
            Style::default().fg(Color::Gray),
        ));
    }

    if let Some(period) = engine.active_period() {
        spans.push(Span::styled(
            format!("  {} filter active", period.label()),
            Style::default().fg(Color::Cyan),
        ));
    }

    TextLine::from(spans)
}
