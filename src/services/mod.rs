// Author: Dustin Pilgrim
// License: MIT

pub mod display;
pub mod input;
pub mod keepalive;
pub mod timer;
