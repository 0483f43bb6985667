use std::sync::Arc;

use crate::api::chat::ChatBackend;
use crate::core::constants::{FALLBACK_REPLY, MAX_INPUT_ROWS, MOOD_RESET_DELAY};
use crate::core::conversation::Conversation;
use crate::core::mood::Mood;
use crate::core::request::{ChatEvent, RequestDispatcher};
use crate::ui::theme::Theme;

/// Runtime state for one chat session.
///
/// Owns the transcript, the mood value, the input buffer, and the
/// single-flight gate. All mutation happens on the UI loop task; spawned
/// work reports back through [`ChatEvent`]s handed to [`App::handle_event`].
pub struct App {
    pub conversation: Conversation,
    pub mood: Mood,
    pub input: String,
    pub scroll_offset: u16,
    /// Bottom-of-transcript offset computed by the last render pass.
    pub scroll_max: u16,
    pub auto_scroll: bool,
    pub markdown_enabled: bool,
    pub syntax_enabled: bool,
    pub theme: Theme,
    pub exit_requested: bool,
    /// Animation frame counter, advanced once per loop tick.
    pub frame: u64,
    in_flight: Option<u64>,
    request_seq: u64,
    backend: Arc<dyn ChatBackend>,
    dispatcher: RequestDispatcher,
}

impl App {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        dispatcher: RequestDispatcher,
        theme: Theme,
        markdown_enabled: bool,
        syntax_enabled: bool,
    ) -> Self {
        Self {
            conversation: Conversation::new(),
            mood: Mood::Neutral,
            input: String::new(),
            scroll_offset: 0,
            scroll_max: 0,
            auto_scroll: true,
            markdown_enabled,
            syntax_enabled,
            theme,
            exit_requested: false,
            frame: 0,
            in_flight: None,
            request_seq: 0,
            backend,
            dispatcher,
        }
    }

    /// True while a request is outstanding. The input area is inert and the
    /// submit path is a no-op for as long as this holds.
    pub fn is_waiting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Submit the current input buffer as a user turn.
    ///
    /// No-ops on blank input and while a request is outstanding. The user
    /// turn is appended synchronously, before the network call is issued.
    pub fn submit_input(&mut self) {
        if self.is_waiting() {
            return;
        }
        let text = self.input.trim();
        if text.is_empty() {
            return;
        }
        let text = text.to_string();
        self.input.clear();
        self.send_message(text);
    }

    fn send_message(&mut self, text: String) {
        self.conversation.push_user(text.clone());
        self.request_seq += 1;
        let request_id = self.request_seq;
        self.in_flight = Some(request_id);
        self.mood = Mood::Thinking;
        self.auto_scroll = true;
        tracing::debug!(request_id, "dispatching chat request");
        self.dispatcher
            .spawn_request(self.backend.clone(), text, request_id);
    }

    /// Apply one event from the dispatch channel.
    pub fn handle_event(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Completed {
                request_id,
                outcome,
            } => {
                if self.in_flight != Some(request_id) {
                    return;
                }
                self.in_flight = None;
                match outcome {
                    Ok(reply) => {
                        tracing::debug!(request_id, "chat request succeeded");
                        self.conversation.push_bot(reply.response);
                        self.mood = Mood::Happy;
                    }
                    Err(err) => {
                        tracing::warn!(request_id, error = %err, "chat request failed");
                        self.conversation.push_bot(FALLBACK_REPLY);
                        self.mood = Mood::Sad;
                    }
                }
                self.auto_scroll = true;
                self.dispatcher
                    .schedule_mood_reset(request_id, MOOD_RESET_DELAY);
            }
            ChatEvent::MoodReset { request_id } => {
                // A reset scheduled by an earlier request must not clobber
                // the mood of a newer one.
                if request_id == self.request_seq && self.in_flight.is_none() {
                    self.mood = Mood::Neutral;
                }
            }
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if self.is_waiting() || c.is_control() {
            return;
        }
        self.input.push(c);
    }

    pub fn insert_newline(&mut self) {
        if self.is_waiting() {
            return;
        }
        self.input.push('\n');
    }

    /// Insert already-sanitized text, e.g. a paste.
    pub fn insert_text(&mut self, text: &str) {
        if self.is_waiting() {
            return;
        }
        self.input.push_str(text);
    }

    pub fn backspace(&mut self) {
        if self.is_waiting() {
            return;
        }
        self.input.pop();
    }

    /// Rows the input area needs for the current buffer, borders excluded.
    pub fn input_area_height(&self) -> u16 {
        let rows = self.input.split('\n').count() as u16;
        rows.clamp(1, MAX_INPUT_ROWS)
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
        self.auto_scroll = false;
    }

    pub fn scroll_down(&mut self, lines: u16, max_offset: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(max_offset);
        if self.scroll_offset >= max_offset {
            self.auto_scroll = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ChatReply};
    use crate::core::message::Role;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// Backend that resolves immediately with a pre-scripted outcome.
    struct ScriptedBackend {
        outcome: Mutex<Option<Result<ChatReply, ApiError>>>,
    }

    impl ScriptedBackend {
        fn ok(response: &str) -> Arc<Self> {
            Arc::new(Self {
                outcome: Mutex::new(Some(Ok(ChatReply {
                    response: response.to_string(),
                    timestamp: "2024-01-01T00:00:00Z".to_string(),
                }))),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                outcome: Mutex::new(Some(Err(ApiError::Http("connection refused".into())))),
            })
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn send_chat(&self, _message: &str) -> Result<ChatReply, ApiError> {
            let taken = self.outcome.lock().unwrap().take();
            match taken {
                Some(outcome) => outcome,
                // Script exhausted: behave like a request that never lands.
                None => std::future::pending().await,
            }
        }
    }

    /// Backend whose request never resolves, for single-flight tests.
    struct StalledBackend;

    #[async_trait]
    impl ChatBackend for StalledBackend {
        async fn send_chat(&self, _message: &str) -> Result<ChatReply, ApiError> {
            std::future::pending().await
        }
    }

    fn app_with(
        backend: Arc<dyn ChatBackend>,
    ) -> (App, mpsc::UnboundedReceiver<ChatEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(
            backend,
            RequestDispatcher::new(tx),
            Theme::dark_default(),
            true,
            true,
        );
        (app, rx)
    }

    #[tokio::test]
    async fn submit_appends_user_turn_synchronously() {
        let (mut app, _rx) = app_with(ScriptedBackend::ok("reply"));
        app.input = "EC2 の状態は？".to_string();
        app.submit_input();

        // Before any event is drained: exactly one turn, the user's.
        assert_eq!(app.conversation.len(), 1);
        let turn = app.conversation.last().unwrap();
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.content, "EC2 の状態は？");
        assert_eq!(app.mood, Mood::Thinking);
        assert!(app.is_waiting());
        assert!(app.input.is_empty());
    }

    #[tokio::test]
    async fn blank_input_is_a_no_op() {
        let (mut app, mut rx) = app_with(ScriptedBackend::ok("reply"));
        for blank in ["", "   ", "\n\n", " \t "] {
            app.input = blank.to_string();
            app.submit_input();
        }

        assert!(app.conversation.is_empty());
        assert_eq!(app.mood, Mood::Neutral);
        assert!(!app.is_waiting());
        // No request was dispatched, so no completion can ever arrive.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn submit_while_waiting_is_a_no_op() {
        let (mut app, _rx) = app_with(Arc::new(StalledBackend));
        app.input = "最初の質問".to_string();
        app.submit_input();
        assert_eq!(app.conversation.len(), 1);

        app.input = "二つ目の質問".to_string();
        app.submit_input();

        assert_eq!(app.conversation.len(), 1);
        assert_eq!(app.input, "二つ目の質問");
    }

    #[tokio::test]
    async fn text_entry_is_inert_while_waiting() {
        let (mut app, _rx) = app_with(Arc::new(StalledBackend));
        app.input = "質問".to_string();
        app.submit_input();

        app.insert_char('x');
        app.insert_newline();
        app.insert_text("paste");
        app.backspace();

        assert!(app.input.is_empty());
    }

    #[tokio::test]
    async fn success_appends_bot_turn_and_turns_happy() {
        let (mut app, mut rx) = app_with(ScriptedBackend::ok("EC2 は 3 台稼働中です。"));
        app.input = "EC2 は何台？".to_string();
        app.submit_input();

        let event = rx.recv().await.unwrap();
        app.handle_event(event);

        assert_eq!(app.conversation.len(), 2);
        let turn = app.conversation.last().unwrap();
        assert_eq!(turn.role, Role::Bot);
        assert_eq!(turn.content, "EC2 は 3 台稼働中です。");
        assert_eq!(app.mood, Mood::Happy);
        assert!(!app.is_waiting());
    }

    #[tokio::test]
    async fn failure_appends_fallback_turn_and_turns_sad() {
        let (mut app, mut rx) = app_with(ScriptedBackend::failing());
        app.input = "Azure VM の一覧".to_string();
        app.submit_input();

        let event = rx.recv().await.unwrap();
        app.handle_event(event);

        assert_eq!(app.conversation.len(), 2);
        let turn = app.conversation.last().unwrap();
        assert_eq!(turn.role, Role::Bot);
        assert_eq!(turn.content, FALLBACK_REPLY);
        assert_eq!(app.mood, Mood::Sad);
        assert!(!app.is_waiting());
    }

    #[tokio::test(start_paused = true)]
    async fn mood_returns_to_neutral_after_the_reset_delay() {
        let (mut app, mut rx) = app_with(ScriptedBackend::ok("reply"));
        app.input = "質問".to_string();
        app.submit_input();

        let completed = rx.recv().await.unwrap();
        app.handle_event(completed);
        assert_eq!(app.mood, Mood::Happy);

        // The reset is scheduled on completion and fires after the fixed
        // delay; paused time advances automatically.
        let reset = rx.recv().await.unwrap();
        app.handle_event(reset);
        assert_eq!(app.mood, Mood::Neutral);
    }

    #[tokio::test]
    async fn stale_mood_reset_is_dropped() {
        let (mut app, mut rx) = app_with(ScriptedBackend::ok("最初の回答"));
        app.input = "最初".to_string();
        app.submit_input();
        let completed = rx.recv().await.unwrap();
        app.handle_event(completed);
        assert_eq!(app.mood, Mood::Happy);

        // A second request dispatches before the first reset fires.
        app.input = "二回目".to_string();
        app.submit_input();
        assert_eq!(app.mood, Mood::Thinking);

        app.handle_event(ChatEvent::MoodReset { request_id: 1 });
        assert_eq!(app.mood, Mood::Thinking);
    }

    #[tokio::test]
    async fn input_height_tracks_line_breaks_up_to_the_cap() {
        let (mut app, _rx) = app_with(ScriptedBackend::ok("reply"));
        assert_eq!(app.input_area_height(), 1);

        app.insert_text("a\nb\nc");
        assert_eq!(app.input_area_height(), 3);

        app.insert_text("\nd\ne\nf\ng");
        assert_eq!(app.input_area_height(), MAX_INPUT_ROWS);
    }

    #[tokio::test]
    async fn manual_scroll_disengages_auto_scroll_until_bottom() {
        let (mut app, _rx) = app_with(ScriptedBackend::ok("reply"));
        app.scroll_offset = 10;
        app.scroll_up(2);
        assert_eq!(app.scroll_offset, 8);
        assert!(!app.auto_scroll);

        app.scroll_down(1, 10);
        assert_eq!(app.scroll_offset, 9);
        assert!(!app.auto_scroll);

        app.scroll_down(5, 10);
        assert_eq!(app.scroll_offset, 10);
        assert!(app.auto_scroll);
    }
}
