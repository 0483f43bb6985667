//! Scroll math for the transcript viewport.
//!
//! The transcript is rendered as a wrapped `Paragraph`; keeping the view
//! pinned to the newest turn means knowing how many terminal rows the
//! transcript occupies after wrapping. The word-aware estimate here mirrors
//! the renderer's `Wrap { trim: true }` behavior closely enough for offset
//! math; exactness only matters within a row or two at the bottom edge.

use ratatui::text::Line;
use unicode_width::UnicodeWidthStr;

/// Display width of one logical line, in terminal columns.
fn line_width(line: &Line) -> usize {
    line.spans
        .iter()
        .map(|span| UnicodeWidthStr::width(span.content.as_ref()))
        .sum()
}

/// Number of terminal rows the given logical lines occupy at `width`.
pub fn wrapped_row_count(lines: &[Line], width: u16) -> u16 {
    if width == 0 {
        return lines.len() as u16;
    }
    let width = width as usize;
    lines
        .iter()
        .map(|line| {
            let w = line_width(line);
            if w == 0 {
                1
            } else {
                w.div_ceil(width) as u16
            }
        })
        .sum()
}

/// Topmost scroll offset that still shows the bottom of the transcript.
pub fn max_scroll_offset(total_rows: u16, viewport_height: u16) -> u16 {
    total_rows.saturating_sub(viewport_height)
}
