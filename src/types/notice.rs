use serde::{Deserialize, Serialize};

/// Default time a notice stays on screen.
pub const DEFAULT_NOTICE_MILLIS: u64 = 3000;
/// Time an explanatory notice (protected column, etc.) stays on screen.
pub const LONG_NOTICE_MILLIS: u64 = 5000;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A transient message for the user, drained by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub duration_ms: u64,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message, DEFAULT_NOTICE_MILLIS)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message, DEFAULT_NOTICE_MILLIS)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message, DEFAULT_NOTICE_MILLIS)
    }

    pub fn new(level: NoticeLevel, message: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            level,
            message: message.into(),
            duration_ms,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}
