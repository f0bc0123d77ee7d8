use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::notification::Notice;

pub const DEFAULT_NOTICE_CAPACITY: usize = 50;

/// Receives the user-visible outcome of every store mutation.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Keeps the most recent notices for display and logs each one.
#[derive(Clone)]
pub struct NoticeBoard {
    recent: Arc<Mutex<VecDeque<Notice>>>,
    capacity: usize,
}

impl NoticeBoard {
    pub fn new(capacity: usize) -> Self {
        Self {
            recent: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// Oldest first.
    pub fn recent(&self) -> Vec<Notice> {
        self.recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn last(&self) -> Option<Notice> {
        self.recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .cloned()
    }

    pub fn clear(&self) {
        self.recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_CAPACITY)
    }
}

impl Notifier for NoticeBoard {
    fn notify(&self, notice: Notice) {
        if notice.is_failure() {
            tracing::warn!(title = %notice.title, description = %notice.description, "notice");
        } else {
            tracing::info!(title = %notice.title, description = %notice.description, "notice");
        }

        let mut recent = self.recent.lock().unwrap_or_else(PoisonError::into_inner);
        if recent.len() == self.capacity {
            recent.pop_front();
        }
        recent.push_back(notice);
    }
}
