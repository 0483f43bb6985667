//! Markdown rendering for bot turns.
//!
//! Agent replies may contain markdown with fenced code blocks. This module
//! flattens a reply into styled ratatui lines: paragraphs, headings, lists,
//! emphasis, inline code, and syntect-highlighted fences. User turns are
//! never routed through here; their content is rendered verbatim.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::ui::theme::Theme;
use crate::utils::syntax::highlight_code_block;

/// Render one bot reply as markdown.
pub fn render_bot_markdown(
    content: &str,
    theme: &Theme,
    syntax_enabled: bool,
) -> Vec<Line<'static>> {
    let mut renderer = MarkdownRenderer::new(theme, syntax_enabled);
    for event in Parser::new_ext(content, Options::ENABLE_STRIKETHROUGH) {
        renderer.push_event(event);
    }
    renderer.finish()
}

/// Render content verbatim, one display line per source line.
pub fn render_plain(content: &str, style: Style) -> Vec<Line<'static>> {
    content
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                Line::from("")
            } else {
                Line::from(Span::styled(line.to_string(), style))
            }
        })
        .collect()
}

struct MarkdownRenderer<'t> {
    theme: &'t Theme,
    syntax_enabled: bool,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    bold_depth: u32,
    italic_depth: u32,
    in_heading: bool,
    /// `(lang hint, buffered source)` while inside a fence.
    code_block: Option<(String, String)>,
    /// Item counters per open list; `None` for bullet lists.
    list_stack: Vec<Option<u64>>,
}

impl<'t> MarkdownRenderer<'t> {
    fn new(theme: &'t Theme, syntax_enabled: bool) -> Self {
        Self {
            theme,
            syntax_enabled,
            lines: Vec::new(),
            spans: Vec::new(),
            bold_depth: 0,
            italic_depth: 0,
            in_heading: false,
            code_block: None,
            list_stack: Vec::new(),
        }
    }

    fn text_style(&self) -> Style {
        let mut style = self.theme.bot_text_style;
        if self.in_heading || self.bold_depth > 0 {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic_depth > 0 {
            style = style.add_modifier(Modifier::ITALIC);
        }
        style
    }

    fn flush_line(&mut self) {
        if !self.spans.is_empty() {
            let spans = std::mem::take(&mut self.spans);
            self.lines.push(Line::from(spans));
        }
    }

    /// Blank separator before a new block, except at the very top.
    fn block_break(&mut self) {
        self.flush_line();
        if !self.lines.is_empty() {
            self.lines.push(Line::from(""));
        }
    }

    fn push_event(&mut self, event: Event) {
        match event {
            Event::Start(Tag::Paragraph) => {
                if self.list_stack.is_empty() {
                    self.block_break();
                }
            }
            Event::End(TagEnd::Paragraph) => self.flush_line(),

            Event::Start(Tag::Heading { .. }) => {
                self.block_break();
                self.in_heading = true;
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush_line();
                self.in_heading = false;
            }

            Event::Start(Tag::Strong) => self.bold_depth += 1,
            Event::End(TagEnd::Strong) => self.bold_depth = self.bold_depth.saturating_sub(1),
            Event::Start(Tag::Emphasis) => self.italic_depth += 1,
            Event::End(TagEnd::Emphasis) => self.italic_depth = self.italic_depth.saturating_sub(1),

            Event::Start(Tag::List(start)) => {
                if self.list_stack.is_empty() {
                    self.block_break();
                }
                self.list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.list_stack.pop();
            }
            Event::Start(Tag::Item) => {
                self.flush_line();
                let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
                let marker = match self.list_stack.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.spans
                    .push(Span::styled(marker, self.theme.bot_text_style));
            }
            Event::End(TagEnd::Item) => self.flush_line(),

            Event::Start(Tag::CodeBlock(kind)) => {
                self.block_break();
                let lang = match kind {
                    CodeBlockKind::Fenced(hint) => hint.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code_block = Some((lang, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((lang, code)) = self.code_block.take() {
                    let rendered = self.render_code_block(&lang, &code);
                    self.lines.extend(rendered);
                }
            }

            Event::Text(text) => {
                if let Some((_, code)) = self.code_block.as_mut() {
                    code.push_str(&text);
                } else {
                    let style = self.text_style();
                    self.spans.push(Span::styled(text.to_string(), style));
                }
            }
            Event::Code(code) => {
                self.spans.push(Span::styled(
                    code.to_string(),
                    self.theme.md_inline_code_style,
                ));
            }

            Event::SoftBreak => {
                let style = self.text_style();
                self.spans.push(Span::styled(" ".to_string(), style));
            }
            Event::HardBreak => self.flush_line(),

            Event::Rule => {
                self.block_break();
                self.lines.push(Line::from(Span::styled(
                    "────────".to_string(),
                    self.theme.subtitle_style,
                )));
            }

            _ => {}
        }
    }

    fn render_code_block(&self, lang: &str, code: &str) -> Vec<Line<'static>> {
        if self.syntax_enabled {
            if let Some(lines) = highlight_code_block(lang, code, self.theme) {
                return lines;
            }
        }
        let mut style = self.theme.bot_text_style;
        if let Some(bg) = self.theme.md_codeblock_bg_color() {
            style = style.bg(bg);
        }
        code.lines()
            .map(|line| Line::from(Span::styled(line.to_string(), style)))
            .collect()
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        while matches!(self.lines.last(), Some(line) if line.spans.iter().all(|s| s.content.is_empty()))
        {
            self.lines.pop();
        }
        self.lines
    }
}
