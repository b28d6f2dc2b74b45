/// Trailing-edge debouncer driven by caller-supplied timestamps.
///
/// Every `poke` pushes the deadline out to `now + window`; `poll` fires once
/// the host clock passes the deadline with no further pokes. Time is passed in
/// rather than read so behavior is deterministic and replayable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Debouncer {
    window_ms: u64,
    deadline_ms: Option<u64>,
}

impl Debouncer {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            deadline_ms: None,
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Records an event at `now_ms`, restarting the quiet window.
    pub fn poke(&mut self, now_ms: u64) {
        self.deadline_ms = Some(now_ms.saturating_add(self.window_ms));
    }

    /// Returns `true` exactly once per burst, when the quiet window elapsed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }
}
