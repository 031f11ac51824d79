use crate::app::{App, DataOrigin, InputState};
use crate::ui::widgets::analytics::render_analytics;
use crate::ui::widgets::map::render_world_map;
use crate::ui::widgets::periods::render_period_tabs;
use crate::ui::widgets::popup::{centered_fixed, centered_rect, ClearWidget};
use crate::ui::widgets::tables::render_record_list;
use crate::ui::widgets::timeline::render_timeline;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;
use sighting_globe::domain::format_year;

pub fn render_globe(app: &App, f: &mut Frame<'_>) {
    let area = f.area().inner(Margin::new(1, 0));

    if app.show_help {
        render_help_popup(f, area);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(10),   // Map and side panel
            Constraint::Length(3), // Period tabs
            Constraint::Length(5), // Timeline
            Constraint::Length(3), // Status
            Constraint::Length(1), // Shortcuts
        ])
        .split(area);

    render_title_section(app, f, layout[0]);
    render_content_section(app, f, layout[1]);
    render_period_tabs(app, f, layout[2]);
    render_timeline(app, f, layout[3]);
    render_status_section(app, f, layout[4]);
    render_shortcuts(f, layout[5]);

    if app.input_state != InputState::Browsing {
        render_prompt(app, f, area);
    } else if let Some(notice) = app.notice.as_deref() {
        render_notice(notice, f, area);
    }
}

fn origin_span(app: &App) -> Span<'static> {
    match app.data_origin {
        DataOrigin::Pending => Span::styled("loading", Style::default().fg(Color::Yellow)),
        DataOrigin::Source => Span::styled("live data", Style::default().fg(Color::Green)),
        DataOrigin::Sample => Span::styled("sample data", Style::default().fg(Color::Magenta)),
    }
}

fn render_title_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = title_block.inner(area);
    f.render_widget(title_block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner);

    let title = Paragraph::new(TextLine::from(vec![
        Span::styled(
            "Sighting ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Globe",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
        origin_span(app),
    ]));
    f.render_widget(title, chunks[0]);

    if app.data_origin == DataOrigin::Pending {
        let (percent, label) = app.load_progress.map_or_else(
            || (0, "Fetching sightings...".to_string()),
            |progress| {
                (
                    progress.percent,
                    format!("{}/{} sources", progress.loaded, progress.total),
                )
            },
        );
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
            .percent(u16::from(percent.min(100)))
            .label(label);
        f.render_widget(gauge, chunks[1]);
        return;
    }

    let dropped = app.raw_count.saturating_sub(app.engine.records().len());
    let mut summary = vec![Span::styled(
        format!("{} sightings", app.engine.records().len()),
        Style::default().fg(Color::White),
    )];
    if dropped > 0 {
        summary.push(Span::styled(
            format!("  ({dropped} skipped)"),
            Style::default().fg(Color::Gray),
        ));
    }
    f.render_widget(
        Paragraph::new(TextLine::from(summary)).alignment(Alignment::Right),
        chunks[1],
    );
}

fn render_content_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(5)])
        .split(horizontal[1]);

    render_world_map(app, f, horizontal[0]);
    render_analytics(app, f, side[0]);
    render_record_list(app, f, side[1]);
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let status_text = if app.status_message.is_empty() {
        Text::from(Span::styled(
            if app.animation_paused {
                "Animation paused"
            } else {
                ""
            },
            Style::default().fg(Color::Gray),
        ))
    } else {
        let style = if app.status_message.starts_with("Error")
            || app.status_message.starts_with("No ")
        {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        Text::from(Span::styled(app.status_message.as_str(), style))
    };

    let status_paragraph = Paragraph::new(status_text)
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

const SHORTCUTS: [(&str, &str); 9] = [
    ("?", "Help"),
    ("Space", "Play"),
    ("←/→", "Year"),
    ("+/-", "Speed"),
    ("1-4", "Period"),
    ("g", "Jump"),
    ("/", "Search"),
    ("Enter", "Details"),
    ("q", "Quit"),
];

fn shortcuts_line() -> TextLine<'static> {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(Color::Gray);

    let mut spans = Vec::with_capacity(SHORTCUTS.len() * 2);
    for (index, (key, action)) in SHORTCUTS.iter().enumerate() {
        let separator = if index + 1 == SHORTCUTS.len() { "" } else { " | " };
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(format!(": {action}{separator}"), text_style));
    }
    TextLine::from(spans)
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let shortcuts_paragraph = Paragraph::new(shortcuts_line()).alignment(Alignment::Center);
    f.render_widget(shortcuts_paragraph, area);
}

fn cursor_char(animation_counter: f64) -> &'static str {
    if (animation_counter * 2.0).sin() > 0.0 {
        "█"
    } else {
        " "
    }
}

pub fn prompt_label(state: InputState) -> &'static str {
    match state {
        InputState::Browsing => "",
        InputState::JumpingToYear => "Jump to year (negative for BCE):",
        InputState::Searching => "Search sightings:",
    }
}

fn prompt_hint(app: &App) -> String {
    match app.input_state {
        InputState::JumpingToYear => {
            format!(" now {}", format_year(app.engine.current_year()))
        }
        InputState::Browsing | InputState::Searching => String::new(),
    }
}

fn render_prompt(app: &App, f: &mut Frame<'_>, area: Rect) {
    let popup = centered_fixed(50, 4, area);
    f.render_widget(ClearWidget, popup);

    let block = Block::default()
        .title(" Enter to confirm · Esc to cancel ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let lines = vec![
        TextLine::from(vec![
            Span::styled(
                prompt_label(app.input_state),
                Style::default().fg(Color::Green),
            ),
            Span::styled(prompt_hint(app), Style::default().fg(Color::Gray)),
        ]),
        TextLine::from(Span::styled(
            format!(
                "> {}{}",
                app.current_input,
                cursor_char(app.animation_counter)
            ),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    f.render_widget(Paragraph::new(Text::from(lines)).block(block), popup);
}

fn render_notice(notice: &str, f: &mut Frame<'_>, area: Rect) {
    let popup = centered_fixed(64, 7, area);
    f.render_widget(ClearWidget, popup);

    let block = Block::default()
        .title(" Data source unavailable ")
        .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let lines = vec![
        TextLine::from(notice.to_string()),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Press Esc to dismiss",
            Style::default().fg(Color::Gray),
        )),
    ];

    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: true }),
        popup,
    );
}

fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(80, 90, area);
    f.render_widget(ClearWidget, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(help_block)
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Center);
    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}

const HELP_KEYS: [(&str, &str); 16] = [
    ("?", "Toggle this help popup"),
    ("Space", "Play or pause the timeline"),
    ("+ / -", "Change playback speed"),
    ("← / →", "Step one year"),
    ("PgUp / PgDn", "Step one hundred years"),
    ("1 - 4", "Toggle a historical period filter"),
    ("0", "Clear the period filter"),
    ("↑ / ↓", "Select a sighting"),
    ("Enter", "Show sighting details"),
    ("g", "Jump to a year"),
    ("/", "Search visible sightings"),
    ("r", "Reload the data source"),
    ("a", "Pause map animation"),
    ("Esc", "Dismiss notice or cancel input"),
    ("q", "Quit application"),
    ("Ctrl+C", "Quit from any screen"),
];

fn build_help_lines() -> Vec<TextLine<'static>> {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        TextLine::from(Span::styled(
            "Sighting Globe",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(
            "Scrub through history to see where sightings were reported. Markers fade as the cursor moves past them.",
        ),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Keyboard Shortcuts:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    lines.extend(HELP_KEYS.iter().map(|(key, action)| {
        TextLine::from(vec![
            Span::styled(format!("  {key:<12}"), key_style),
            Span::raw(format!(" - {action}")),
        ])
    }));

    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled(
        "CLI Options:",
        Style::default().add_modifier(Modifier::BOLD),
    )));

    let help_text = crate::cli::CliArgs::help_text();
    for line in help_text.lines() {
        if line.starts_with("Usage") || line.starts_with("Options") || line.trim().is_empty() {
            continue;
        }
        lines.push(TextLine::from(line.to_string()));
    }

    lines
}
