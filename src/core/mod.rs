// Author: Dustin Pilgrim
// License: MIT

pub mod action;
pub mod config;
pub mod controller;
pub mod controller_msg;
pub mod duration;
pub mod error;
pub mod events;
pub mod state;
pub mod utils;

#[cfg(test)]
mod controller_tests;
