// Author: Dustin Pilgrim
// License: MIT

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod daemon;
pub mod lapse_log;
pub mod log;
pub mod services;
