use crate::app::App;
use crate::ui::widgets::map::category_color;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;
use sighting_globe::domain::format_year;

/// First row to draw so that `selected_index` stays on screen.
pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows || max_visible_rows == 0 {
        return 0;
    }

    if selected_index >= max_visible_rows {
        let offset = selected_index + 1 - max_visible_rows;
        let last_page = total_rows - max_visible_rows;
        return if offset > last_page { last_page } else { offset };
    }

    0
}

pub fn render_record_list(app: &App, f: &mut Frame<'_>, area: Rect) {
    let total_rows = app.listed_count();
    let block = Block::default()
        .title(if total_rows == 0 {
            " Sightings ".to_string()
        } else {
            format!(" Sightings ({} of {total_rows}) ", app.selected_index + 1)
        })
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    if total_rows == 0 {
        let paragraph = Paragraph::new("No sightings in view")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Year"),
        Cell::from("Place"),
        Cell::from("Category"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    // Borders and header take three rows
    let max_visible_rows = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(total_rows, max_visible_rows, app.selected_index);

    let rows = app
        .listed_records()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(position, record)| {
            let style = if position == app.selected_index {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let year = record.year.map_or_else(|| "?".to_string(), format_year);
            Row::new(vec![
                Cell::from(year),
                Cell::from(record.location.clone()),
                Cell::from(record.category.label())
                    .style(Style::default().fg(category_color(record.category))),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Length(9),
        Constraint::Min(10),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);

    f.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_selection_on_screen() {
        assert_eq!(scroll_offset(5, 10, 4), 0);
        assert_eq!(scroll_offset(50, 10, 3), 0);
        assert_eq!(scroll_offset(50, 10, 10), 1);
        assert_eq!(scroll_offset(50, 10, 49), 40);
        assert_eq!(scroll_offset(50, 0, 20), 0);
    }
}
