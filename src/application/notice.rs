//! Transient user notices.

use std::time::{Duration, Instant};

/// How long a notice stays on screen unless told otherwise.
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
    Warning,
}

/// A short message for the user, with a display duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub duration: Duration,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: DEFAULT_NOTICE_DURATION,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, message)
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// A notice currently on screen.
#[derive(Debug, Clone)]
pub struct Toast {
    pub notice: Notice,
    pub shown_at: Instant,
}

impl Toast {
    pub fn new(notice: Notice, now: Instant) -> Self {
        Self { notice, shown_at: now }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.notice.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_use_default_duration() {
        let notice = Notice::warning("小心");
        assert_eq!(notice.kind, NoticeKind::Warning);
        assert_eq!(notice.message, "小心");
        assert_eq!(notice.duration, DEFAULT_NOTICE_DURATION);
    }

    #[test]
    fn test_toast_expiry() {
        let start = Instant::now();
        let toast = Toast::new(Notice::info("hi").with_duration(Duration::from_millis(500)), start);

        assert!(!toast.is_expired(start));
        assert!(!toast.is_expired(start + Duration::from_millis(499)));
        assert!(toast.is_expired(start + Duration::from_millis(500)));
    }
}
