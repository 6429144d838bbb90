// Author: Dustin Pilgrim
// License: MIT

pub mod engine;
pub mod keepalive;

use crate::core::{action::Action, config::Config, duration::DurationResult};
use crate::{ldebug, lwarn};

pub use self::keepalive::KeepaliveHandler;

/// Seconds past expiry after which the display stops updating.
pub const EXPIRED_FREEZE_SECONDS: u64 = 8 * 60 * 60;

/// What one recomputation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub result: DurationResult,
    pub actions: Vec<Action>,
}

/// Drives one session countdown. Pure with respect to time: every
/// operation takes the current clock reading from the caller and answers
/// with actions for the host to perform.
pub struct Controller {
    cfg: Config,
    keepalive: Option<Box<dyn KeepaliveHandler>>,
    keepalive_failed: bool,
}

impl Controller {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            keepalive: None,
            keepalive_failed: false,
        }
    }

    /// An in-process handler or a keepalive command is active.
    pub fn has_custom_keepalive(&self) -> bool {
        !self.keepalive_failed && (self.keepalive.is_some() || self.cfg.keepalive_command.is_some())
    }

    pub fn keepalive_failed(&self) -> bool {
        self.keepalive_failed
    }

    /// Install a new configuration and keepalive handler.
    ///
    /// A handler that failed before stays disabled for the lifetime of this
    /// controller; later handlers are dropped.
    pub fn configure(&mut self, cfg: Config, handler: Option<Box<dyn KeepaliveHandler>>) {
        ldebug!(
            "controller",
            "configure: duration_ms={}, when={:?}, keepalive={}s, command={:?}, custom_handler={}",
            cfg.duration_ms,
            cfg.when,
            cfg.keepalive_threshold_seconds,
            cfg.keepalive_command,
            handler.is_some(),
        );

        if cfg.duration_ms <= 0 && cfg.when.is_none() {
            lwarn!("controller", "no duration configured; relative resets are disabled");
        }

        let custom = handler.is_some() || cfg.keepalive_command.is_some();
        if self.keepalive_failed && custom {
            lwarn!("controller", "custom keepalive handler ignored (a previous handler failed)");
        }

        self.cfg = cfg;
        self.keepalive = if self.keepalive_failed { None } else { handler };
    }
}

impl Default for Controller {
    fn default() -> Self {
        Controller::new(Config::disabled())
    }
}
