//! Syntect-backed highlighting for fenced code blocks.

use crate::ui::theme::Theme;
use ratatui::style::Color as TuiColor;
use ratatui::text::{Line, Span};
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, OnceLock};

// Bounded FIFO cache keyed by (lang, code, theme) so redraws don't re-run
// syntect on every frame.
struct HighlightCache {
    map: HashMap<u64, Vec<Line<'static>>>,
    order: VecDeque<u64>,
    cap: usize,
}

impl HighlightCache {
    fn new(cap: usize) -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
            cap,
        }
    }

    fn get(&self, key: u64) -> Option<Vec<Line<'static>>> {
        self.map.get(&key).cloned()
    }

    fn put(&mut self, key: u64, lines: Vec<Line<'static>>) {
        if !self.map.contains_key(&key) {
            self.order.push_back(key);
        }
        self.map.insert(key, lines);
        while self.map.len() > self.cap {
            match self.order.pop_front() {
                Some(old) => {
                    self.map.remove(&old);
                }
                None => break,
            }
        }
    }
}

static HIGHLIGHT_CACHE: Mutex<Option<HighlightCache>> = Mutex::new(None);

fn cache_key(lang: &str, code: &str, theme_name: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    lang.hash(&mut hasher);
    code.hash(&mut hasher);
    theme_name.hash(&mut hasher);
    hasher.finish()
}

fn is_dark_background(c: &TuiColor) -> bool {
    match c {
        TuiColor::Rgb(r, g, b) => {
            let brightness = 0.2126 * (*r as f32) + 0.7152 * (*g as f32) + 0.0722 * (*b as f32);
            brightness < 128.0
        }
        TuiColor::White => false,
        _ => true,
    }
}

/// Map common fence language aliases to syntect tokens.
pub(crate) fn normalize_lang_hint(s: &str) -> String {
    let t = s.trim().to_ascii_lowercase();
    match t.as_str() {
        "py" | "python" => "python".into(),
        "bash" | "sh" | "zsh" | "shell" => "bash".into(),
        "js" | "javascript" | "jsx" => "javascript".into(),
        "ts" | "tsx" | "typescript" => "typescript".into(),
        "rust" | "rs" => "rust".into(),
        "yaml" | "yml" => "yaml".into(),
        "c" | "h" => "c".into(),
        "cpp" | "cc" | "cxx" | "hpp" => "cpp".into(),
        other => other.into(),
    }
}

pub(crate) fn pick_syntect_theme_name(theme: &Theme) -> &'static str {
    if is_dark_background(&theme.background_color) {
        "base16-ocean.dark"
    } else {
        "InspiredGitHub"
    }
}

/// Highlight one fenced code block into styled lines. Returns `None` when
/// syntect has no usable theme, letting the caller fall back to plain text.
pub fn highlight_code_block(
    lang_hint: &str,
    code: &str,
    theme: &Theme,
) -> Option<Vec<Line<'static>>> {
    static SYNTAX_SET: OnceLock<syntect::parsing::SyntaxSet> = OnceLock::new();
    static THEME_SET: OnceLock<syntect::highlighting::ThemeSet> = OnceLock::new();
    let ps = SYNTAX_SET.get_or_init(syntect::parsing::SyntaxSet::load_defaults_newlines);
    let ts = THEME_SET.get_or_init(syntect::highlighting::ThemeSet::load_defaults);

    let lang = normalize_lang_hint(lang_hint);
    let theme_name = pick_syntect_theme_name(theme);
    let syn_theme = ts
        .themes
        .get(theme_name)
        .or_else(|| ts.themes.values().next())?;

    let key = cache_key(&lang, code, theme_name);
    {
        let mut guard = HIGHLIGHT_CACHE.lock().unwrap();
        let cache = guard.get_or_insert_with(|| HighlightCache::new(64));
        if let Some(lines) = cache.get(key) {
            return Some(lines);
        }
    }

    let syntax = ps
        .find_syntax_by_token(&lang)
        .unwrap_or_else(|| ps.find_syntax_plain_text());

    let mut highlighter = syntect::easy::HighlightLines::new(syntax, syn_theme);
    let bg = theme.md_codeblock_bg_color();

    let mut out: Vec<Line<'static>> = Vec::new();
    for line in syntect::util::LinesWithEndings::from(code) {
        let ranges = highlighter.highlight_line(line, ps).ok()?;
        let mut spans: Vec<Span<'static>> = Vec::new();
        for (style, text) in ranges {
            let frag = text.strip_suffix('\n').unwrap_or(text);
            let fg = style.foreground;
            let mut st = ratatui::style::Style::default().fg(TuiColor::Rgb(fg.r, fg.g, fg.b));
            if let Some(bg) = bg {
                st = st.bg(bg);
            }
            spans.push(Span::styled(frag.to_string(), st));
        }
        if spans.is_empty() {
            out.push(Line::from(""));
        } else {
            out.push(Line::from(spans));
        }
    }

    let mut guard = HIGHLIGHT_CACHE.lock().unwrap();
    if let Some(cache) = guard.as_mut() {
        cache.put(key, out.clone());
    }
    Some(out)
}
