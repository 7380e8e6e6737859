//! Coalesced tag-list filtering.
//!
//! Keystrokes in the tag search field schedule a filter pass on a
//! [`CoalescingTimer`]. Only the most recently scheduled query runs, and only
//! after the idle window elapsed; earlier queries are superseded, never run.

/// Holds at most one pending value until an idle window has elapsed.
///
/// Timestamps are milliseconds from a host-chosen monotonic origin.
///
/// # Examples
///
/// ```
/// use versenav::tags::CoalescingTimer;
///
/// let mut timer = CoalescingTimer::new(300);
/// timer.schedule("gr", 0);
/// timer.schedule("gra", 100);
///
/// assert_eq!(timer.take_ready(350), None);
/// assert_eq!(timer.take_ready(400), Some("gra"));
/// assert!(!timer.is_pending());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoalescingTimer<T> {
    window_ms: u64,
    pending: Option<(T, u64)>,
}

impl<T> CoalescingTimer<T> {
    #[must_use]
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            pending: None,
        }
    }

    /// Schedules `value`, replacing whatever was pending and restarting the window.
    pub fn schedule(&mut self, value: T, now_ms: u64) {
        self.pending = Some((value, now_ms));
    }

    /// Returns the pending value once the window has elapsed since it was scheduled.
    pub fn take_ready(&mut self, now_ms: u64) -> Option<T> {
        let (_, scheduled_at) = self.pending.as_ref()?;
        if now_ms.saturating_sub(*scheduled_at) < self.window_ms {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub const fn window_ms(&self) -> u64 {
        self.window_ms
    }
}

/// Case-insensitive substring match of a tag title against the filter query.
///
/// An empty query matches every title.
#[must_use]
pub fn title_matches(title: &str, query: &str) -> bool {
    title.to_lowercase().contains(&query.to_lowercase())
}
