// Author: Dustin Pilgrim
// License: MIT

use crate::core::{
    action::{Action, Signal},
    duration::{compute, format_instant, parse_instant},
    error::Error,
    events::Event,
    state::{Phase, State},
};
use crate::{ldebug, lerror, linfo};

use super::{Controller, EXPIRED_FREEZE_SECONDS, TickOutcome};

impl Controller {
    pub fn handle_event(&mut self, state: &mut State, event: Event) -> Result<Vec<Action>, Error> {
        match event {
            Event::Tick { now_ms } => {
                // Late tick from a timer that was already replaced or torn down.
                if !state.started() || state.frozen() {
                    return Ok(Vec::new());
                }
                Ok(self.tick(state, now_ms).actions)
            }

            Event::Interaction { kind, now_ms } => {
                ldebug!("controller", "interaction: {}", kind.as_str());
                Ok(self.record_interaction(state, now_ms))
            }

            Event::ResetRelative { now_ms } => self.reset_relative(state, now_ms),

            Event::ResetAbsolute { when, now_ms } => self.reset_absolute_raw(state, &when, now_ms),

            Event::KeepaliveFailed { reason, .. } => Ok(self.record_keepalive_failure(&reason)),
        }
    }

    /// Pick the initial target and draw the first frame.
    ///
    /// An explicit `when` wins over the relative duration; a `when` that
    /// does not parse leaves the target unknown until a valid reset.
    pub fn start(&mut self, state: &mut State, now_ms: i64) -> TickOutcome {
        state.prime_keepalive(now_ms);
        state.set_started(true);
        state.set_was_past(false);

        let target = match self.cfg.when.as_deref() {
            Some(raw) => {
                let parsed = parse_instant(raw);
                if parsed.is_none() {
                    lerror!("controller", "{}", Error::InvalidTarget(raw.to_string()));
                }
                parsed
            }
            None if self.cfg.duration_ms > 0 => Some(now_ms.saturating_add(self.cfg.duration_ms)),
            None => None,
        };

        state.set_target_ms(target);

        if let Some(t) = target {
            linfo!("controller", "session expires at {}", format_instant(t));
        }

        self.tick(state, now_ms)
    }

    /// Recompute the display and decide when to look again.
    pub fn tick(&mut self, state: &mut State, now_ms: i64) -> TickOutcome {
        let result = compute(now_ms, state.target_ms(), &self.cfg.labels);

        let mut actions = vec![Action::Render {
            prefix: result.prefix_text(),
            duration: result.duration_text(),
        }];

        if result.invalid {
            state.set_phase(Phase::Invalid);
            state.set_frozen(true);
            actions.push(Action::CancelSchedule);
            return TickOutcome { result, actions };
        }

        if result.is_past && !state.was_past() {
            state.mark_expired();
            linfo!("controller", "session expired");
            actions.push(Action::Notify(Signal::SessionExpired));
        }

        state.set_was_past(result.is_past);
        state.set_phase(if result.is_past { Phase::Expired } else { Phase::Counting });

        if result.is_past && result.diff_seconds >= EXPIRED_FREEZE_SECONDS {
            if !state.frozen() {
                ldebug!("controller", "expired for {}s; display frozen", result.diff_seconds);
            }
            state.set_frozen(true);
            actions.push(Action::CancelSchedule);
        } else {
            state.set_frozen(false);
            actions.push(Action::Schedule {
                delay_ms: result.reschedule_delay_ms,
            });
        }

        TickOutcome { result, actions }
    }

    /// Extend the session to now + configured duration.
    pub fn reset_relative(&mut self, state: &mut State, now_ms: i64) -> Result<Vec<Action>, Error> {
        if self.cfg.duration_ms <= 0 {
            return Err(Error::PastTarget);
        }

        let target = now_ms.saturating_add(self.cfg.duration_ms);
        Ok(self.replace_target(state, target, now_ms))
    }

    /// Move the target to an explicit instant, which must be later than now.
    pub fn reset_absolute(
        &mut self,
        state: &mut State,
        target_ms: i64,
        now_ms: i64,
    ) -> Result<Vec<Action>, Error> {
        if target_ms <= now_ms {
            return Err(Error::PastTarget);
        }

        Ok(self.replace_target(state, target_ms, now_ms))
    }

    pub fn reset_absolute_raw(
        &mut self,
        state: &mut State,
        raw: &str,
        now_ms: i64,
    ) -> Result<Vec<Action>, Error> {
        let target = parse_instant(raw).ok_or_else(|| Error::InvalidTarget(raw.to_string()))?;
        self.reset_absolute(state, target, now_ms)
    }

    /// Cancel the pending timer and stop reacting to ticks.
    /// Safe to call any number of times, started or not.
    pub fn teardown(&mut self, state: &mut State) -> Vec<Action> {
        if state.started() {
            ldebug!("controller", "teardown");
        }
        state.set_started(false);
        state.set_frozen(true);
        vec![Action::CancelSchedule]
    }

    fn replace_target(&mut self, state: &mut State, target_ms: i64, now_ms: i64) -> Vec<Action> {
        linfo!("controller", "session reset; expires at {}", format_instant(target_ms));

        state.set_target_ms(Some(target_ms));
        state.set_was_past(false);
        state.set_started(true);

        self.tick(state, now_ms).actions
    }
}
