//! Main chat event loop.
//!
//! Owns the terminal lifecycle (raw mode, alternate screen) and the single
//! loop that routes key, mouse, and paste events into the [`App`], drains
//! completion and mood-reset events from the dispatch channel, and advances
//! the animation frame. The 50ms event poll doubles as the animation tick.

use std::error::Error;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
        EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::api::chat::HttpChatBackend;
use crate::core::app::App;
use crate::core::request::{ChatEvent, RequestDispatcher};
use crate::ui::renderer::ui;
use crate::ui::theme::Theme;
use crate::utils::input::sanitize_text_input;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Run one interactive session against the agent at `endpoint`.
pub async fn run(
    endpoint: String,
    theme: Theme,
    markdown_enabled: bool,
    syntax_enabled: bool,
) -> Result<(), Box<dyn Error>> {
    let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
    let backend = Arc::new(HttpChatBackend::new(client, endpoint));

    let (tx, mut rx) = mpsc::unbounded_channel::<ChatEvent>();
    let mut app = App::new(
        backend,
        RequestDispatcher::new(tx),
        theme,
        markdown_enabled,
        syntax_enabled,
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, &mut rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<ChatEvent>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => app.scroll_up(3),
                    MouseEventKind::ScrollDown => {
                        let max = app.scroll_max;
                        app.scroll_down(3, max);
                    }
                    _ => {}
                },
                Event::Paste(text) => app.insert_text(&sanitize_text_input(&text)),
                _ => {}
            }
        }

        while let Ok(chat_event) = rx.try_recv() {
            app.handle_event(chat_event);
        }

        app.frame = app.frame.wrapping_add(1);

        if app.exit_requested {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.exit_requested = true;
        }
        // Enter submits; Alt+Enter inserts a line break instead.
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => app.insert_newline(),
        KeyCode::Enter => app.submit_input(),
        KeyCode::Char(c) => app.insert_char(c),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => {
            let max = app.scroll_max;
            app.scroll_down(1, max);
        }
        _ => {}
    }
}
