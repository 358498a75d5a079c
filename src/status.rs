//! 状態メッセージ
//!
//! 各処理は [`StatusEvent`] を返すだけで、表示は呼び出し側（CLI等）が行う。

use std::time::{Duration, Instant};

/// バナーの自動消去までの時間
pub const STATUS_DISMISS_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub kind: StatusKind,
    pub message: String,
}

impl StatusEvent {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

impl std::fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            StatusKind::Success => write!(f, "✔ {}", self.message),
            StatusKind::Error => write!(f, "✖ {}", self.message),
        }
    }
}

/// 一時表示バナー
///
/// 新しいメッセージは前のメッセージと消去期限を置き換える。
#[derive(Debug, Default)]
pub struct StatusBanner {
    current: Option<(StatusEvent, Instant)>,
}

impl StatusBanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, event: StatusEvent, now: Instant) {
        self.current = Some((event, now + STATUS_DISMISS_AFTER));
    }

    /// `now` 時点で表示中のメッセージ
    pub fn visible(&self, now: Instant) -> Option<&StatusEvent> {
        match &self.current {
            Some((event, deadline)) if now < *deadline => Some(event),
            _ => None,
        }
    }
}
