pub const DEFAULT_AUTOPLAY_INTERVAL_MS: u64 = 5_000;

/// Repeating schedule polled by the UI loop. Stopping clears the pending
/// deadline, so no tick can fire after `stop` returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autoplay {
    interval_ms: u64,
    next_due_ms: Option<u64>,
}

impl Default for Autoplay {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOPLAY_INTERVAL_MS)
    }
}

impl Autoplay {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            next_due_ms: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_active(&self) -> bool {
        self.next_due_ms.is_some()
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.next_due_ms
    }

    /// Returns false when autoplay was already running.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.is_active() {
            return false;
        }
        self.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
        true
    }

    /// Returns true when a running schedule was cancelled.
    pub fn stop(&mut self) -> bool {
        self.next_due_ms.take().is_some()
    }

    /// Consumes the due tick, if any. The next one is due a full interval
    /// after `now_ms`, so a late poll never releases a backlog of ticks.
    pub fn take_due_tick(&mut self, now_ms: u64) -> bool {
        match self.next_due_ms {
            Some(due) if due <= now_ms => {
                self.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
                true
            }
            _ => false,
        }
    }
}
