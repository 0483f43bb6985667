//! Kumo is a terminal-first chat client for the Multi-Cloud Info Agent.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the append-only conversation transcript,
//!   the mood value derived from the request lifecycle, the single-flight
//!   request dispatcher, and configuration.
//! - [`ui`] renders the terminal interface (transcript, avatar panel, input
//!   area) and runs the interactive event loop that drives user input and
//!   display updates.
//! - [`api`] defines the chat wire payloads and the backend seam used to
//!   talk to the agent's `/api/chat` endpoint.
//!
//! The runtime entrypoint lives in the binary crate (`src/main.rs`), which
//! parses arguments, loads configuration, and dispatches into
//! [`ui::chat_loop`] for the interactive session.

pub mod api;
pub mod core;
pub mod ui;
pub mod utils;
