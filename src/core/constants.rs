//! Shared constants used across the application.
//!
//! The visible strings are the agent product's Japanese UI copy; rendering
//! and tests must agree on them, so they live in one place.

use std::time::Duration;

/// Application title shown in the header.
pub const APP_TITLE: &str = "Multi-Cloud Info Agent";

/// Subtitle shown under the header title.
pub const APP_SUBTITLE: &str = "AWS と Azure のリソース情報を自然言語で確認";

/// Placeholder shown in the empty input box.
pub const INPUT_PLACEHOLDER: &str = "AWSやAzureのリソースについて質問してください...";

/// Composing indicator shown in the transcript while a request is outstanding.
pub const COMPOSING_INDICATOR: &str = "エージェントが回答を準備中...";

/// Bot turn appended when a request fails, whatever the cause.
pub const FALLBACK_REPLY: &str = "申し訳ございません。エラーが発生しました。";

/// How long a happy/sad mood lingers before reverting to neutral.
pub const MOOD_RESET_DELAY: Duration = Duration::from_secs(2);

/// Agent base URL used when neither the CLI nor the config file names one.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// Upper bound on the input area height, in text rows.
pub const MAX_INPUT_ROWS: u16 = 5;
