use crate::app::App;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::canvas::{Canvas, Circle, Map, MapResolution, Points};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use sighting_globe::domain::Category;
use sighting_globe::engine::FilterMode;

/// Records older than this many years before the cursor are dimmed.
pub const FADE_AFTER_YEARS: i32 = 20;

/// How a marker is drawn relative to the timeline cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerEmphasis {
    /// Period mode: plain category colour.
    Plain,
    /// Dated in the cursor year.
    Current,
    Recent,
    Faded,
}

pub fn marker_emphasis(year: Option<i32>, mode: FilterMode, cursor_year: i32) -> MarkerEmphasis {
    match (mode, year) {
        (FilterMode::Period, _) | (FilterMode::Cursor, None) => MarkerEmphasis::Plain,
        (FilterMode::Cursor, Some(year)) if year == cursor_year => MarkerEmphasis::Current,
        (FilterMode::Cursor, Some(year))
            if i64::from(cursor_year) - i64::from(year) > i64::from(FADE_AFTER_YEARS) =>
        {
            MarkerEmphasis::Faded
        }
        (FilterMode::Cursor, Some(_)) => MarkerEmphasis::Recent,
    }
}

pub const fn category_color(category: Category) -> Color {
    let (r, g, b) = category.rgb();
    Color::Rgb(r, g, b)
}

/// Category colour adjusted for emphasis. `pulse` runs from 0.0 to 1.0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn marker_color(category: Category, emphasis: MarkerEmphasis, pulse: f64) -> Color {
    let (r, g, b) = category.rgb();
    let mix = |channel: u8, target: f64, amount: f64| {
        let channel = f64::from(channel);
        (amount.mul_add(target - channel, channel)).round().clamp(0.0, 255.0) as u8
    };
    match emphasis {
        MarkerEmphasis::Plain | MarkerEmphasis::Recent => Color::Rgb(r, g, b),
        MarkerEmphasis::Faded => Color::Rgb(mix(r, 0.0, 0.55), mix(g, 0.0, 0.55), mix(b, 0.0, 0.55)),
        MarkerEmphasis::Current => {
            let amount = pulse.clamp(0.0, 1.0) * 0.7;
            Color::Rgb(mix(r, 255.0, amount), mix(g, 255.0, amount), mix(b, 255.0, amount))
        }
    }
}

/// Groups marker coordinates by colour so each group is drawn once.
fn marker_layers(app: &App, pulse: f64) -> Vec<(Color, Vec<(f64, f64)>)> {
    let engine = &app.engine;
    let mut layers: Vec<(Color, Vec<(f64, f64)>)> = Vec::new();

    for record in app.listed_records() {
        let emphasis = marker_emphasis(record.year, engine.mode(), engine.current_year());
        let color = marker_color(record.category, emphasis, pulse);
        let point = (record.position.lng, record.position.lat);
        match layers.iter_mut().find(|(c, _)| *c == color) {
            Some((_, coords)) => coords.push(point),
            None => layers.push((color, vec![point])),
        }
    }
    layers
}

pub fn render_world_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title = format!(" World · {} shown ", app.listed_count());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if area.width < 10 || area.height < 5 {
        f.render_widget(block, area);
        return;
    }

    if app.engine.records().is_empty() {
        let paragraph = Paragraph::new("Waiting for data...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let pulse = (app.animation_counter * 3.0).sin().mul_add(0.5, 0.5);
    let layers = marker_layers(app, pulse);
    let selected = app.selected_record();

    let canvas = Canvas::default()
        .block(block)
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();

            for (color, coords) in &layers {
                ctx.draw(&Points {
                    coords: coords.as_slice(),
                    color: *color,
                });
            }

            if let Some(record) = selected {
                ctx.draw(&Circle {
                    x: record.position.lng,
                    y: record.position.lat,
                    radius: pulse.mul_add(2.0, 3.0),
                    color: Color::Yellow,
                });
            }
        })
        .x_bounds([-180.0, 180.0])
        .y_bounds([-90.0, 90.0]);

    f.render_widget(canvas, area);
}
