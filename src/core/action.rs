// Author: Dustin Pilgrim
// License: MIT

/// Named notifications forwarded to the host. Both carry a `true` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    SessionExpired,
    Keepalive,
}

impl Signal {
    pub fn name(&self) -> &'static str {
        match self {
            Signal::SessionExpired => "session-expired",
            Signal::Keepalive => "keepalive",
        }
    }

    pub fn detail(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show `prefix` then `duration` on the display sink.
    Render {
        prefix: String,
        duration: String,
    },

    /// Emit a notification on the host's event channel.
    Notify(Signal),

    /// Run the configured keepalive command off the event loop. Failure
    /// comes back as `Event::KeepaliveFailed`.
    RunKeepalive {
        command: String,
    },

    /// Arm the timer slot; any pending timer is replaced.
    Schedule {
        delay_ms: u64,
    },

    /// Drop the pending timer, if any.
    CancelSchedule,
}
