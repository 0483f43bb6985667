use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::api::chat::ChatBackend;
use crate::api::{ApiError, ChatReply};

/// Events delivered back to the UI loop by spawned tasks.
///
/// Every event is tagged with the id of the request that produced it so the
/// receiver can drop deliveries belonging to a superseded request.
#[derive(Debug)]
pub enum ChatEvent {
    /// The outstanding request resolved, successfully or not.
    Completed {
        request_id: u64,
        outcome: Result<ChatReply, ApiError>,
    },
    /// The delayed mood reset for a finished request came due.
    MoodReset { request_id: u64 },
}

/// Hands work to the async runtime and routes results back to the UI loop
/// over an unbounded channel.
///
/// The dispatcher does not enforce single-flight; the submit path does.
#[derive(Clone)]
pub struct RequestDispatcher {
    tx: mpsc::UnboundedSender<ChatEvent>,
}

impl RequestDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<ChatEvent>) -> Self {
        Self { tx }
    }

    /// Issue one chat request on the runtime. The completion event lands on
    /// the channel whenever the backend resolves.
    pub fn spawn_request(&self, backend: Arc<dyn ChatBackend>, message: String, request_id: u64) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = backend.send_chat(&message).await;
            let _ = tx.send(ChatEvent::Completed {
                request_id,
                outcome,
            });
        });
    }

    /// Schedule the delayed mood reset for a finished request.
    ///
    /// The timer is never cancelled; instead the event carries the request id
    /// and the receiver ignores resets from requests that are no longer the
    /// most recent one.
    pub fn schedule_mood_reset(&self, request_id: u64, delay: Duration) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(ChatEvent::MoodReset { request_id });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoBackend;

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn send_chat(&self, message: &str) -> Result<ChatReply, ApiError> {
            Ok(ChatReply {
                response: message.to_string(),
                timestamp: "2024-01-01T00:00:00Z".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn spawned_request_reports_completion_with_its_id() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = RequestDispatcher::new(tx);

        dispatcher.spawn_request(Arc::new(EchoBackend), "ping".to_string(), 7);

        match rx.recv().await.unwrap() {
            ChatEvent::Completed {
                request_id,
                outcome,
            } => {
                assert_eq!(request_id, 7);
                assert_eq!(outcome.unwrap().response, "ping");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn mood_reset_fires_after_the_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = RequestDispatcher::new(tx);
        let start = tokio::time::Instant::now();

        dispatcher.schedule_mood_reset(3, Duration::from_secs(2));

        match rx.recv().await.unwrap() {
            ChatEvent::MoodReset { request_id } => assert_eq!(request_id, 3),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
