use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::core::app::App;
use crate::core::constants::{APP_SUBTITLE, APP_TITLE, COMPOSING_INDICATOR, INPUT_PLACEHOLDER};
use crate::core::message::Role;
use crate::ui::avatar::{render_avatar, AVATAR_PANEL_WIDTH};
use crate::ui::markdown::{render_bot_markdown, render_plain};
use crate::utils::scroll::{max_scroll_offset, wrapped_row_count};

pub fn ui(f: &mut Frame, app: &mut App) {
    f.render_widget(
        Block::default().style(ratatui::style::Style::default().bg(app.theme.background_color)),
        f.area(),
    );

    let input_area_height = app.input_area_height();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(input_area_height + 2), // +2 for borders
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(AVATAR_PANEL_WIDTH)])
        .split(chunks[1]);

    render_transcript(f, body[0], app);
    render_avatar(f, body[1], app);
    render_input(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title = format!("☁ {} v{}", APP_TITLE, env!("CARGO_PKG_VERSION"));
    let lines = vec![
        Line::from(Span::styled(title, app.theme.title_style)),
        Line::from(Span::styled(APP_SUBTITLE, app.theme.subtitle_style)),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

/// Flatten the conversation into display lines, one blank line between
/// turns, with the composing indicator appended while a request is out.
pub fn transcript_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for msg in app.conversation.iter() {
        match msg.role {
            Role::User => {
                let mut first = true;
                for content_line in msg.content.lines() {
                    if first {
                        lines.push(Line::from(vec![
                            Span::styled("You: ", app.theme.user_prefix_style),
                            Span::styled(content_line.to_string(), app.theme.user_text_style),
                        ]));
                        first = false;
                    } else {
                        lines.push(Line::from(Span::styled(
                            content_line.to_string(),
                            app.theme.user_text_style,
                        )));
                    }
                }
            }
            Role::Bot => {
                if app.markdown_enabled {
                    lines.extend(render_bot_markdown(
                        &msg.content,
                        &app.theme,
                        app.syntax_enabled,
                    ));
                } else {
                    lines.extend(render_plain(&msg.content, app.theme.bot_text_style));
                }
            }
        }
        lines.push(Line::from("")); // Empty line for spacing
    }

    if app.is_waiting() {
        lines.push(Line::from(Span::styled(
            format!("{} {}", pulse_symbol(app.frame), COMPOSING_INDICATOR),
            app.theme.composing_style,
        )));
    }

    lines
}

/// One pulse cycle of the composing indicator, keyed off the loop tick.
fn pulse_symbol(frame: u64) -> &'static str {
    const FRAMES: [&str; 4] = ["○", "◐", "●", "◐"];
    FRAMES[(frame / 5 % 4) as usize]
}

fn render_transcript(f: &mut Frame, area: Rect, app: &mut App) {
    let lines = transcript_lines(app);

    let total_rows = wrapped_row_count(&lines, area.width);
    let max_offset = max_scroll_offset(total_rows, area.height);
    if app.auto_scroll {
        app.scroll_offset = max_offset;
    } else {
        app.scroll_offset = app.scroll_offset.min(max_offset);
    }
    app.scroll_max = max_offset;

    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .scroll((app.scroll_offset, 0));
    f.render_widget(transcript, area);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let title = if app.is_waiting() {
        COMPOSING_INDICATOR
    } else {
        "メッセージを入力 (Enter で送信、Alt+Enter で改行、Ctrl+C で終了)"
    };

    let empty = app.input.is_empty();
    let (text, style) = if empty && !app.is_waiting() {
        (INPUT_PLACEHOLDER.to_string(), app.theme.placeholder_style)
    } else {
        (app.input.clone(), app.theme.input_text_style)
    };

    // Keep the newest input rows visible when the buffer outgrows the box.
    let inner_height = area.height.saturating_sub(2);
    let input_rows = app.input.split('\n').count() as u16;
    let input_scroll = input_rows.saturating_sub(inner_height.max(1));

    let border_style = if app.is_waiting() {
        app.theme.placeholder_style
    } else {
        app.theme.input_border_style
    };

    let input = Paragraph::new(text)
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(title, app.theme.input_title_style)),
        )
        .wrap(Wrap { trim: false }) // Don't trim whitespace to preserve newlines
        .scroll((input_scroll, 0));

    f.render_widget(input, area);

    // The cursor sits at the end of the buffer; hide it while the input is
    // inert so the disabled state reads at a glance.
    if !app.is_waiting() {
        let last_line = app.input.rsplit('\n').next().unwrap_or("");
        let cursor_x = area.x + 1 + UnicodeWidthStr::width(last_line) as u16;
        let visible_row = (input_rows.max(1) - 1).min(inner_height.saturating_sub(1));
        let cursor_y = area.y + 1 + visible_row;
        f.set_cursor_position((cursor_x.min(area.x + area.width.saturating_sub(2)), cursor_y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::chat::ChatBackend;
    use crate::api::{ApiError, ChatReply};
    use crate::core::request::RequestDispatcher;
    use crate::ui::theme::Theme;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    struct NullBackend;

    #[async_trait]
    impl ChatBackend for NullBackend {
        async fn send_chat(&self, _message: &str) -> Result<ChatReply, ApiError> {
            std::future::pending().await
        }
    }

    fn test_app() -> App {
        // The receiver is dropped; dispatch sends are fire-and-forget.
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(
            Arc::new(NullBackend),
            RequestDispatcher::new(tx),
            Theme::dark_default(),
            true,
            false,
        )
    }

    fn texts(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn user_turns_get_a_prefix_and_turns_are_spaced() {
        let mut app = test_app();
        app.conversation.push_user("質問です");
        app.conversation.push_bot("回答です");

        let lines = transcript_lines(&app);
        let texts = texts(&lines);
        assert_eq!(
            texts,
            vec!["You: 質問です", "", "回答です", ""],
        );
    }

    #[test]
    fn multi_line_user_turns_only_prefix_the_first_line() {
        let mut app = test_app();
        app.conversation.push_user("一行目\n二行目");

        let texts = texts(&transcript_lines(&app));
        assert_eq!(texts, vec!["You: 一行目", "二行目", ""]);
    }

    #[tokio::test]
    async fn composing_indicator_appears_only_while_waiting() {
        let mut app = test_app();
        app.conversation.push_user("質問");
        assert!(!texts(&transcript_lines(&app))
            .iter()
            .any(|t| t.contains(COMPOSING_INDICATOR)));

        app.input = "質問".to_string();
        app.submit_input();
        assert!(texts(&transcript_lines(&app))
            .iter()
            .any(|t| t.contains(COMPOSING_INDICATOR)));
    }

    #[test]
    fn pulse_symbol_loops() {
        assert_eq!(pulse_symbol(0), "○");
        assert_eq!(pulse_symbol(5), "◐");
        assert_eq!(pulse_symbol(10), "●");
        assert_eq!(pulse_symbol(15), "◐");
        assert_eq!(pulse_symbol(20), "○");
    }
}
