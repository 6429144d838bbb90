// Author: Dustin Pilgrim
// License: MIT

use crate::core::{
    action::{Action, Signal},
    error::Error,
    state::State,
};
use crate::{ldebug, lerror};

use super::Controller;

pub type AnyError = Box<dyn std::error::Error + Send + Sync>;

/// Host-supplied replacement for the default `keepalive` notification.
pub trait KeepaliveHandler: Send {
    fn keepalive(&mut self) -> Result<(), AnyError>;
}

impl<F> KeepaliveHandler for F
where
    F: FnMut() -> Result<(), AnyError> + Send,
{
    fn keepalive(&mut self) -> Result<(), AnyError> {
        self()
    }
}

impl Controller {
    /// Note user activity and signal keepalive at most once per threshold.
    pub fn record_interaction(&mut self, state: &mut State, now_ms: i64) -> Vec<Action> {
        state.touch_interaction(now_ms);

        if !self.cfg.keepalive_enabled() {
            return Vec::new();
        }

        let threshold_ms = i64::try_from(self.cfg.keepalive_threshold_seconds)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        if now_ms.saturating_sub(state.last_keepalive_ms()) <= threshold_ms {
            return Vec::new();
        }

        state.mark_keepalive(now_ms);

        if self.keepalive_failed {
            return vec![Action::Notify(Signal::Keepalive)];
        }

        if let Some(handler) = self.keepalive.as_mut() {
            return match handler.keepalive() {
                Ok(()) => {
                    ldebug!("controller", "custom keepalive handler ran");
                    Vec::new()
                }
                Err(e) => self.record_keepalive_failure(&e.to_string()),
            };
        }

        match self.cfg.keepalive_command.clone() {
            Some(command) => vec![Action::RunKeepalive { command }],
            None => vec![Action::Notify(Signal::Keepalive)],
        }
    }

    /// Disable the custom handler for good and fall back to the default
    /// signal for the keepalive that just failed.
    pub fn record_keepalive_failure(&mut self, reason: &str) -> Vec<Action> {
        lerror!("controller", "{}", Error::KeepaliveCallbackFailure(reason.to_string()));

        if self.keepalive_failed {
            return Vec::new();
        }

        self.keepalive = None;
        self.keepalive_failed = true;
        vec![Action::Notify(Signal::Keepalive)]
    }
}
