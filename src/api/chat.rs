use async_trait::async_trait;

use crate::api::{ApiError, ChatReply, ChatRequest};
use crate::utils::url::construct_endpoint;

/// Seam over the agent's chat endpoint so the request lifecycle can be
/// exercised without a live agent.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_chat(&self, message: &str) -> Result<ChatReply, ApiError>;
}

/// HTTP implementation speaking to `POST {base_url}/api/chat`.
pub struct HttpChatBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatBackend {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send_chat(&self, message: &str) -> Result<ChatReply, ApiError> {
        let url = construct_endpoint(&self.base_url, "api/chat");
        let request = ChatRequest {
            message: message.to_string(),
        };

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Http(Box::new(e)))?;

        // Status codes are deliberately not inspected: an error body that
        // fails to decode is the same failure as a transport error.
        response
            .json::<ChatReply>()
            .await
            .map_err(|e| ApiError::Decode(Box::new(e)))
    }
}
