use ratatui::style::{Color, Modifier, Style};

use crate::core::mood::Mood;

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub bot_text_style: Style,

    // Chrome
    pub title_style: Style,
    pub subtitle_style: Style,
    pub composing_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub avatar_border_style: Style,

    // Input area
    pub input_text_style: Style,
    pub placeholder_style: Style,

    // Markdown details
    pub md_inline_code_style: Style,
    pub md_codeblock_bg: Option<Color>,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            bot_text_style: Style::default().fg(Color::White),

            title_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            subtitle_style: Style::default().fg(Color::Gray),
            composing_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            avatar_border_style: Style::default().fg(Color::Gray),

            input_text_style: Style::default().fg(Color::White),
            placeholder_style: Style::default().fg(Color::DarkGray),

            md_inline_code_style: Style::default().fg(Color::Yellow),
            md_codeblock_bg: Some(Color::Rgb(24, 24, 24)),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            bot_text_style: Style::default().fg(Color::Black),

            title_style: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            subtitle_style: Style::default().fg(Color::DarkGray),
            composing_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),
            avatar_border_style: Style::default().fg(Color::DarkGray),

            input_text_style: Style::default().fg(Color::Black),
            placeholder_style: Style::default().fg(Color::Gray),

            md_inline_code_style: Style::default().fg(Color::Rgb(160, 80, 0)),
            md_codeblock_bg: Some(Color::Rgb(235, 235, 235)),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            // Fallback
            _ => Self::dark_default(),
        }
    }

    pub fn md_codeblock_bg_color(&self) -> Option<Color> {
        self.md_codeblock_bg
    }

    /// Status dot color for a mood, matching the agent product's palette.
    pub fn mood_color(&self, mood: Mood) -> Color {
        match mood {
            Mood::Thinking => Color::Rgb(255, 165, 0),
            Mood::Happy => Color::Rgb(0, 255, 0),
            Mood::Sad => Color::Rgb(255, 0, 0),
            Mood::Neutral => Color::Rgb(0, 191, 255),
        }
    }
}
