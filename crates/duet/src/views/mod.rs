//! View rendering modules

mod side_by_side;
mod status;

pub use side_by_side::render_side_by_side;
pub use status::render_status;

use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;

/// Drop the first `columns` display columns from a run of spans
fn skip_columns(spans: Vec<Span<'static>>, columns: usize) -> Vec<Span<'static>> {
    let mut remaining = columns;
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        if remaining == 0 {
            out.push(span);
            continue;
        }
        let mut kept = String::new();
        for ch in span.content.chars() {
            let width = ch.width().unwrap_or(0);
            if remaining > 0 {
                // A wide char cut in half leaves a blank column behind
                if width > remaining {
                    kept.push(' ');
                }
                remaining = remaining.saturating_sub(width);
                continue;
            }
            kept.push(ch);
        }
        if !kept.is_empty() {
            out.push(Span::styled(kept, span.style));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(spans: &[Span<'_>]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_skip_columns_across_spans() {
        let spans = vec![Span::raw("abc"), Span::raw("def")];
        assert_eq!(text(&skip_columns(spans.clone(), 0)), "abcdef");
        assert_eq!(text(&skip_columns(spans.clone(), 4)), "ef");
        assert!(skip_columns(spans, 10).is_empty());
    }

    #[test]
    fn test_skip_columns_wide_chars() {
        let spans = vec![Span::raw("你好x")];
        assert_eq!(text(&skip_columns(spans.clone(), 2)), "好x");
        assert_eq!(text(&skip_columns(spans, 1)), " 好x");
    }
}
