//! One-shot timers delivered as explicit events
//!
//! The host advances the queue with its own clock once per frame; due timers
//! come back as [`TimerEvent`]s for the state machine. A cancelled timer is
//! removed outright, so it can never fire late or twice.

/// Handle returned by [`TimerQueue::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// What a timer means when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The level transition screen has been shown long enough
    TransitionDisplayElapsed,
    /// The transition overlay finished fading out
    FadeOutElapsed,
}

#[derive(Debug, Clone)]
struct PendingTimer {
    id: TimerId,
    due_ms: f64,
    event: TimerEvent,
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now_ms: f64,
    pending: Vec<PendingTimer>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current queue time (last value passed to `advance_to`)
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Fire `event` once `delay_ms` has passed from the current queue time
    pub fn schedule(&mut self, delay_ms: f64, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            id,
            due_ms: self.now_ms + delay_ms,
            event,
        });
        id
    }

    /// Remove a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move the clock forward and return every timer now due, earliest first.
    /// Time never runs backwards; an older `now_ms` is ignored.
    pub fn advance_to(&mut self, now_ms: f64) -> Vec<TimerEvent> {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
        let now = self.now_ms;
        let mut due: Vec<PendingTimer> = Vec::new();
        self.pending.retain(|t| {
            if t.due_ms <= now {
                due.push(t.clone());
                false
            } else {
                true
            }
        });
        // Stable sort keeps scheduling order for equal deadlines
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due.into_iter().map(|t| t.event).collect()
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
