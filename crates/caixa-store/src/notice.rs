//! # Notices
//!
//! The user-visible surface of action failures: one line per failure,
//! drained by the UI (the toast analog). Successful mutations emit
//! nothing here; they speak through the snapshot itself.

use std::collections::VecDeque;

/// Notices kept before the oldest is dropped. A UI that never drains
/// should not grow the log without bound.
const MAX_NOTICES: usize = 64;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A one-line user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Bounded FIFO log of notices.
#[derive(Debug, Default)]
pub struct NoticeLog {
    entries: VecDeque<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        if self.entries.len() == MAX_NOTICES {
            self.entries.pop_front();
        }
        self.entries.push_back(notice);
    }

    /// Removes and returns every pending notice, oldest first.
    pub fn take_all(&mut self) -> Vec<Notice> {
        self.entries.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_drain() {
        let mut log = NoticeLog::new();
        assert!(log.is_empty());

        log.push(Notice::error("boom"));
        log.push(Notice::info("ok"));
        assert_eq!(log.len(), 2);

        let drained = log.take_all();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, NoticeLevel::Error);
        assert_eq!(drained[0].message, "boom");
        assert!(log.is_empty());
    }

    #[test]
    fn test_bounded() {
        let mut log = NoticeLog::new();
        for i in 0..(MAX_NOTICES + 10) {
            log.push(Notice::info(format!("n{}", i)));
        }
        assert_eq!(log.len(), MAX_NOTICES);
        // Oldest entries were dropped.
        assert_eq!(log.take_all()[0].message, "n10");
    }
}
