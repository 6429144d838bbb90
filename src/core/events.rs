// Author: Dustin Pilgrim
// License: MIT

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Focus,
    Blur,
    KeyUp,
    PointerDown,
    Scroll,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Focus => "focus",
            InteractionKind::Blur => "blur",
            InteractionKind::KeyUp => "keyup",
            InteractionKind::PointerDown => "pointerdown",
            InteractionKind::Scroll => "scroll",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The pending re-schedule timer fired.
    Tick {
        now_ms: i64,
    },

    Interaction {
        kind: InteractionKind,
        now_ms: i64,
    },

    /// Push the target out to now + configured duration.
    ResetRelative {
        now_ms: i64,
    },

    /// Replace the target with an explicit date-time string.
    ResetAbsolute {
        when: String,
        now_ms: i64,
    },

    /// The host's keepalive command failed or timed out.
    KeepaliveFailed {
        reason: String,
        now_ms: i64,
    },
}
