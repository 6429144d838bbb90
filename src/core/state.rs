// Author: Dustin Pilgrim
// License: MIT

/// Coarse phase, derived from the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Counting,
    Expired,
    Invalid,
}

#[derive(Debug, Clone)]
pub struct State {
    // Session expiry; None when the configured target could not be parsed.
    target_ms: Option<i64>,

    // Edge detection for the expiry transition.
    was_past: bool,
    phase: Phase,

    // No timer is pending (invalid target, past the freeze bound, torn down).
    frozen: bool,
    started: bool,

    // Keepalive throttling (ms since epoch, monotonic non-decreasing).
    last_interaction_ms: i64,
    last_keepalive_ms: i64,

    expired_count: u64,
    keepalive_count: u64,
}

impl State {
    pub fn new(now_ms: i64) -> Self {
        Self {
            target_ms: None,
            was_past: false,
            phase: Phase::Invalid,
            frozen: true,
            started: false,
            last_interaction_ms: now_ms,
            last_keepalive_ms: now_ms,
            expired_count: 0,
            keepalive_count: 0,
        }
    }

    // ---------------- getters ----------------

    pub fn target_ms(&self) -> Option<i64> {
        self.target_ms
    }

    pub fn was_past(&self) -> bool {
        self.was_past
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn frozen(&self) -> bool {
        self.frozen
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn last_interaction_ms(&self) -> i64 {
        self.last_interaction_ms
    }

    pub fn last_keepalive_ms(&self) -> i64 {
        self.last_keepalive_ms
    }

    pub fn expired_count(&self) -> u64 {
        self.expired_count
    }

    pub fn keepalive_count(&self) -> u64 {
        self.keepalive_count
    }

    // ---------------- setters ----------------

    /// Replace the target wholesale.
    pub fn set_target_ms(&mut self, target: Option<i64>) {
        self.target_ms = target;
    }

    pub fn set_was_past(&mut self, v: bool) {
        self.was_past = v;
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn set_frozen(&mut self, v: bool) {
        self.frozen = v;
    }

    pub fn set_started(&mut self, v: bool) {
        self.started = v;
    }

    pub fn touch_interaction(&mut self, now_ms: i64) {
        self.last_interaction_ms = self.last_interaction_ms.max(now_ms);
    }

    pub fn mark_keepalive(&mut self, now_ms: i64) {
        self.last_keepalive_ms = self.last_keepalive_ms.max(now_ms);
        self.keepalive_count += 1;
    }

    pub fn mark_expired(&mut self) {
        self.expired_count += 1;
    }

    // ---------------- cycle control ----------------

    /// Fresh keepalive window starting at `now_ms`.
    pub fn prime_keepalive(&mut self, now_ms: i64) {
        self.last_interaction_ms = now_ms;
        self.last_keepalive_ms = now_ms;
    }
}

impl Default for State {
    fn default() -> Self {
        State::new(0)
    }
}
