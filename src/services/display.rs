// Author: Dustin Pilgrim
// License: MIT

use std::io::{self, IsTerminal, Write};

use crate::core::action::Signal;

/// Where the countdown text ends up.
pub trait DisplaySink: Send {
    fn render(&mut self, prefix: &str, duration: &str);

    /// Called once on teardown.
    fn finish(&mut self) {}
}

/// Where named notifications end up.
pub trait NotificationChannel: Send {
    fn notify(&mut self, signal: Signal);
}

/// Redraws one status line on a terminal, or prints one line per change
/// when stdout is piped.
pub struct TerminalDisplay {
    inline: bool,
    last: Option<String>,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            inline: io::stdout().is_terminal(),
            last: None,
        }
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for TerminalDisplay {
    fn render(&mut self, prefix: &str, duration: &str) {
        let line = format_line(prefix, duration);
        if self.last.as_deref() == Some(line.as_str()) {
            return;
        }

        let mut out = io::stdout().lock();
        let _ = if self.inline {
            write!(out, "\r\x1b[2K{line}")
        } else {
            writeln!(out, "{line}")
        };
        let _ = out.flush();

        self.last = Some(line);
    }

    fn finish(&mut self) {
        if self.inline && self.last.is_some() {
            println!();
        }
    }
}

/// Prints signals as `name: true`, or as JSON lines.
pub struct TerminalNotifier {
    json: bool,
}

impl TerminalNotifier {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl NotificationChannel for TerminalNotifier {
    fn notify(&mut self, signal: Signal) {
        // Notifications go to stderr so they never tear the status line.
        eprintln!("\n{}", format_signal(signal, self.json));
    }
}

pub fn format_line(prefix: &str, duration: &str) -> String {
    format!("{prefix} {duration}")
}

pub fn format_signal(signal: Signal, json: bool) -> String {
    if json {
        serde_json::json!({
            "event": signal.name(),
            "detail": signal.detail(),
        })
        .to_string()
    } else {
        format!("{}: {}", signal.name(), signal.detail())
    }
}
