//! Status line

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.result.stats();
    let punctuation = if app.options.ignore_punctuation {
        "ignored"
    } else {
        "kept"
    };
    let position = if app.result.is_empty() {
        "0/0".to_string()
    } else {
        format!("{}/{}", app.cursor + 1, app.result.len())
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.mode),
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
        ),
        Span::raw(format!(" {} ", app.mode.description())),
        Span::raw(format!(
            "| punctuation {punctuation} | ~{} -{} +{} | {position} ",
            stats.modified, stats.deleted, stats.inserted
        )),
        Span::styled(
            "| j/k scroll  n/N change  m mode  p punct  q quit",
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
