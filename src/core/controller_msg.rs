// Author: Dustin Pilgrim
// License: MIT

use crate::core::events::Event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerMsg {
    Event(Event),

    /// Leave the run loop and tear everything down.
    Stop {
        reason: String,
    },
}
