//! Side-by-side view - left and right documents in row-aligned panes

use super::skip_columns;
use crate::app::App;
use crate::config::Palette;
use duet_core::{styled_runs, HighlightMode, Line as DiffLine, StyleIntent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Width of the line number gutter ("1234 ")
const GUTTER_WIDTH: usize = 5;

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Render both panes
pub fn render_side_by_side(frame: &mut Frame, app: &mut App, palette: &Palette, area: Rect) {
    let [left_area, right_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    // Borders take one row above and below
    app.viewport_height = left_area.height.saturating_sub(2) as usize;
    app.scroll = app
        .scroll
        .min(app.result.len().saturating_sub(app.viewport_height));

    render_pane(frame, app, palette, left_area, Side::Left);
    render_pane(frame, app, palette, right_area, Side::Right);
}

fn render_pane(frame: &mut Frame, app: &App, palette: &Palette, area: Rect, side: Side) {
    let (lines, name) = match side {
        Side::Left => (&app.result.left_lines, &app.left.name),
        Side::Right => (&app.result.right_lines, &app.right.name),
    };
    let format = match side {
        Side::Left => app.options.left_format,
        Side::Right => app.options.right_format,
    };

    // Line numbers count real lines only, fillers get a blank gutter
    let mut number = lines
        .iter()
        .take(app.scroll)
        .filter(|l| !l.is_imaginary())
        .count();

    let mut rendered = Vec::with_capacity(app.viewport_height);
    for line in lines.iter().skip(app.scroll).take(app.viewport_height) {
        let gutter = if line.is_imaginary() {
            " ".repeat(GUTTER_WIDTH)
        } else {
            number += 1;
            format!("{number:>width$} ", width = GUTTER_WIDTH - 1)
        };
        let mut spans = vec![Span::styled(
            gutter,
            Style::default().add_modifier(Modifier::DIM),
        )];
        spans.extend(skip_columns(
            content_spans(line, app.mode, palette),
            app.h_scroll,
        ));
        rendered.push(Line::from(spans).style(row_style(line, app.mode, palette)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {name} ({format}) "));
    frame.render_widget(Paragraph::new(rendered).block(block), area);
}

fn content_spans(line: &DiffLine, mode: HighlightMode, palette: &Palette) -> Vec<Span<'static>> {
    styled_runs(line, mode)
        .into_iter()
        .map(|run| Span::styled(run.text.to_string(), palette.style(run.intent)))
        .collect()
}

/// Whole-line intents also paint the rest of the row
fn row_style(line: &DiffLine, mode: HighlightMode, palette: &Palette) -> Style {
    if line.is_split() && mode != HighlightMode::WholeLine {
        return Style::default();
    }
    match styled_runs(line, mode).first() {
        Some(run) if run.intent != StyleIntent::Plain => {
            let style = palette.style(run.intent);
            Style {
                bg: style.bg,
                ..Style::default()
            }
        }
        _ => Style::default(),
    }
}
