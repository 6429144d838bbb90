// Author: Dustin Pilgrim
// License: MIT

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "lapse",
    version = env!("CARGO_PKG_VERSION"),
    about = "Session expiry countdown with keepalive signalling"
)]
pub struct Args {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action)]
    pub verbose: bool,

    /// Do not write the log file.
    #[arg(long, action)]
    pub no_log_file: bool,

    /// Print notifications as JSON lines.
    #[arg(long, action)]
    pub json: bool,

    #[command(flatten)]
    pub session: SessionArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Overrides for values from the config file.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Session lifetime; below 180000 means seconds, otherwise milliseconds.
    #[arg(short, long, allow_hyphen_values = true)]
    pub duration: Option<String>,

    /// Explicit expiry instant (ISO 8601).
    #[arg(short, long)]
    pub when: Option<String>,

    /// Seconds between keepalive signals (must exceed 30).
    #[arg(short, long)]
    pub keepalive: Option<String>,

    /// Shell command run instead of the default keepalive notification.
    #[arg(long, value_name = "CMD")]
    pub keepalive_command: Option<String>,

    #[arg(long)]
    pub before: Option<String>,

    #[arg(long)]
    pub after: Option<String>,

    #[arg(long)]
    pub start: Option<String>,

    #[arg(long)]
    pub end: Option<String>,
}

impl SessionArgs {
    pub fn to_settings(&self) -> Settings {
        Settings {
            duration: self.duration.clone(),
            when: self.when.clone(),
            keepalive: self.keepalive.clone(),
            keepalive_command: self.keepalive_command.clone(),
            before: self.before.clone(),
            after: self.after.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "Run the live countdown (default)")]
    Watch,

    #[command(about = "Describe the distance to a target time once")]
    Describe {
        /// Target instant (ISO 8601 or epoch milliseconds).
        target: String,

        /// Reference instant; defaults to the current time.
        #[arg(long)]
        now: Option<String>,
    },
}
