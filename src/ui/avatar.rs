//! Avatar panel: one face per mood plus a looping micro-animation.
//!
//! The face is a static glyph chosen by the mood; motion comes from a
//! pulsing status dot and, while thinking, a one-row bob. Both are keyed
//! off the loop's frame counter, so the panel animates at the event-loop
//! cadence without any timer of its own.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::core::app::App;
use crate::core::mood::Mood;
use crate::ui::theme::Theme;

/// Columns reserved for the avatar panel, borders included.
pub const AVATAR_PANEL_WIDTH: u16 = 24;

fn face(mood: Mood) -> &'static str {
    match mood {
        Mood::Neutral => "(・_・)",
        Mood::Thinking => "(・_・?)",
        Mood::Happy => "(＾▽＾)",
        Mood::Sad => "(；_；)",
    }
}

/// One pulse cycle of the status dot. The loop ticks at ~20Hz, so dividing
/// the frame keeps the pulse around two seconds per cycle.
fn status_dot(frame: u64) -> &'static str {
    const FRAMES: [&str; 4] = ["·", "o", "O", "o"];
    FRAMES[(frame / 10 % 4) as usize]
}

/// While thinking the face bobs one row up and down.
fn bob_offset(mood: Mood, frame: u64) -> usize {
    if mood == Mood::Thinking {
        (frame / 10 % 2) as usize
    } else {
        0
    }
}

/// Build the panel's inner lines for the given mood and animation frame.
pub fn avatar_lines(mood: Mood, frame: u64, theme: &Theme) -> Vec<Line<'static>> {
    let dot_style = Style::default().fg(theme.mood_color(mood));
    let mut lines = vec![Line::from(vec![
        Span::raw("  "),
        Span::styled(status_dot(frame).to_string(), dot_style),
    ])];

    for _ in 0..(1 + bob_offset(mood, frame)) {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        format!("   {}", face(mood)),
        theme.bot_text_style,
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("   {}", mood.as_str()),
        theme.subtitle_style,
    )));

    lines
}

pub fn render_avatar(f: &mut Frame, area: Rect, app: &App) {
    let panel = Paragraph::new(avatar_lines(app.mood, app.frame, &app.theme)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.avatar_border_style)
            .title("エージェント"),
    );
    f.render_widget(panel, area);
}
