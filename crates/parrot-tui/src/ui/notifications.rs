// Toast queue for transient status feedback (reply arrived, note merged, ...)

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            ToastLevel::Info => "ℹ",
            ToastLevel::Success => "✓",
            ToastLevel::Warning => "⚠",
            ToastLevel::Error => "✗",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub duration: Duration,
    shown_at: Option<Instant>,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(message, ToastLevel::Info, Duration::from_secs(3))
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::with_level(message, ToastLevel::Success, Duration::from_secs(3))
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(message, ToastLevel::Warning, Duration::from_secs(4))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(message, ToastLevel::Error, Duration::from_secs(5))
    }

    fn with_level(message: impl Into<String>, level: ToastLevel, duration: Duration) -> Self {
        Self {
            message: message.into(),
            level,
            duration,
            shown_at: None,
        }
    }

    fn is_expired(&self) -> bool {
        self.shown_at
            .map(|shown| shown.elapsed() >= self.duration)
            .unwrap_or(false)
    }

    fn mark_shown(&mut self) {
        if self.shown_at.is_none() {
            self.shown_at = Some(Instant::now());
        }
    }
}

/// Shows one toast at a time; higher levels preempt lower ones, duplicates
/// within a short window are swallowed.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: VecDeque<Toast>,
    current: Option<Toast>,
    recent: Vec<(u64, Instant)>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: Toast) {
        let hash = Self::hash_message(&toast.message);
        let now = Instant::now();
        self.recent.retain(|(_, expiry)| *expiry > now);
        if self.recent.iter().any(|(h, _)| *h == hash) {
            return;
        }
        self.recent.push((hash, now + Duration::from_secs(2)));

        if let Some(ref current) = self.current {
            if toast.level > current.level {
                // Preempted toast is dropped, not re-queued; it was already seen
                let mut t = toast;
                t.mark_shown();
                self.current = Some(t);
                return;
            }
        }

        if self.current.is_none() {
            let mut t = toast;
            t.mark_shown();
            self.current = Some(t);
        } else {
            let pos = self
                .pending
                .iter()
                .position(|t| t.level < toast.level)
                .unwrap_or(self.pending.len());
            self.pending.insert(pos, toast);
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.current = None;
        self.advance();
    }

    /// Called on the UI tick to expire and rotate toasts
    pub fn tick(&mut self) {
        if self.current.as_ref().is_some_and(|t| t.is_expired()) {
            self.current = None;
            self.advance();
        }
    }

    fn advance(&mut self) {
        if self.current.is_none() {
            if let Some(mut next) = self.pending.pop_front() {
                next.mark_shown();
                self.current = Some(next);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }

    fn hash_message(message: &str) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        message.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_shows_immediately() {
        let mut q = ToastQueue::new();
        assert!(q.is_empty());
        q.push(Toast::info("saved"));
        assert_eq!(q.current().unwrap().message, "saved");
    }

    #[test]
    fn test_higher_level_preempts() {
        let mut q = ToastQueue::new();
        q.push(Toast::info("background"));
        q.push(Toast::error("disk full"));
        assert_eq!(q.current().unwrap().level, ToastLevel::Error);
        // Preempted info toast was dropped
        q.dismiss();
        assert!(q.current().is_none());
    }

    #[test]
    fn test_duplicate_suppressed() {
        let mut q = ToastQueue::new();
        q.push(Toast::info("note merged"));
        q.push(Toast::info("note merged"));
        q.dismiss();
        assert!(q.is_empty());
    }

    #[test]
    fn test_lower_level_queued_behind_current() {
        let mut q = ToastQueue::new();
        q.push(Toast::warning("first"));
        q.push(Toast::info("second"));
        assert_eq!(q.current().unwrap().message, "first");
        q.dismiss();
        assert_eq!(q.current().unwrap().message, "second");
    }
}
