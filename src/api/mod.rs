use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;

pub mod chat;

/// Body of `POST /api/chat`.
#[derive(Serialize, Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
}

/// Successful response payload from `POST /api/chat`.
#[derive(Deserialize, Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub timestamp: String,
}

/// Failure from the chat endpoint.
///
/// The variants exist for log diagnostics only. Callers treat every failure
/// uniformly: a connect error and a body that fails to decode both surface
/// to the user as the same fixed fallback reply.
#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a usable response (connect, timeout, TLS).
    Http(Box<dyn StdError + Send + Sync>),
    /// The response body could not be decoded as a chat reply.
    Decode(Box<dyn StdError + Send + Sync>),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http(source) => write!(f, "chat request failed: {source}"),
            ApiError::Decode(source) => write!(f, "unexpected chat response body: {source}"),
        }
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ApiError::Http(source) | ApiError::Decode(source) => Some(source.as_ref()),
        }
    }
}
