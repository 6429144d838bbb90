// Author: Dustin Pilgrim
// License: MIT

use std::fmt::Arguments;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Local;
use once_cell::sync::Lazy;

use crate::lapse_log::{Rotation, SessionLog};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum LogLevel {
    Error = 1,
    Warn  = 2,
    Info  = 3,
    Debug = 4,
}

impl LogLevel {
    /// ANSI color for the console bullet
    fn color(&self) -> &'static str {
        match self {
            LogLevel::Error => "\x1b[31m",
            LogLevel::Warn  => "\x1b[33m",
            LogLevel::Info  => "\x1b[36m",
            LogLevel::Debug => "\x1b[90m",
        }
    }

    fn short(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERR",
            LogLevel::Warn  => "WRN",
            LogLevel::Info  => "INF",
            LogLevel::Debug => "DBG",
        }
    }
}

const RESET_COLOR: &str = "\x1b[0m";

pub struct Config {
    pub level: LogLevel,
    pub use_colors: bool,
    /// Console echo for everything at or above `level`, not only errors.
    pub console: bool,
    /// Append to this file when set.
    pub file: Option<SessionLog>,
}

pub static GLOBAL_CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| {
    Mutex::new(Config {
        level: LogLevel::Info,
        use_colors: std::io::stderr().is_terminal(),
        console: false,
        file: None,
    })
});

fn config() -> MutexGuard<'static, Config> {
    GLOBAL_CONFIG.lock().unwrap_or_else(|e| e.into_inner())
}

/// Set verbose/debug mode
pub fn set_verbose(enabled: bool) {
    let mut config = config();
    config.level = if enabled { LogLevel::Debug } else { LogLevel::Info };
    config.console = enabled;
}

/// Route log lines to `path`, rotating it first if it grew too large.
pub fn enable_file_output(path: &Path) -> std::io::Result<()> {
    let log = SessionLog::open(path, Rotation::default())?;
    config().file = Some(log);
    Ok(())
}

/// Core logging function
pub fn log_message(level: LogLevel, prefix: &str, args: Arguments) {
    let config = config();

    if level > config.level {
        return;
    }

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    let file_line = format!("[{}][{}][{}] {}", timestamp, level.short(), prefix, args);

    if let Some(log) = config.file.as_ref() {
        if let Err(e) = log.append(&file_line) {
            eprintln!("Failed to write log: {}", e);
        }
    }

    if config.console || level == LogLevel::Error {
        let console_line = if config.use_colors {
            format!("{}●{} [{}][{}] {}", level.color(), RESET_COLOR, timestamp, prefix, args)
        } else {
            file_line
        };
        // stdout belongs to the display sink
        eprintln!("{}", console_line);
    }
}

/// Flexible macro to allow formatted logging
#[macro_export]
macro_rules! llog {
    ($level:expr, $prefix:expr, $($arg:tt)*) => {
        $crate::log::log_message($level, $prefix, format_args!($($arg)*))
    };
}

/// Convenience macros
#[macro_export]
macro_rules! linfo {
    ($prefix:expr, $($arg:tt)*) => { $crate::llog!($crate::log::LogLevel::Info, $prefix, $($arg)*) };
}

#[macro_export]
macro_rules! lwarn {
    ($prefix:expr, $($arg:tt)*) => { $crate::llog!($crate::log::LogLevel::Warn, $prefix, $($arg)*) };
}

#[macro_export]
macro_rules! lerror {
    ($prefix:expr, $($arg:tt)*) => { $crate::llog!($crate::log::LogLevel::Error, $prefix, $($arg)*) };
}

#[macro_export]
macro_rules! ldebug {
    ($prefix:expr, $($arg:tt)*) => { $crate::llog!($crate::log::LogLevel::Debug, $prefix, $($arg)*) };
}

/// Default log file path
pub fn log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("lapse")
        .join("lapse.log")
}
