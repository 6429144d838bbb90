// Author: Dustin Pilgrim
// License: MIT

use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

use crate::core::{controller_msg::ControllerMsg, events::Event, utils::now_ms};
use crate::{ldebug, linfo};

/// Upper bound for one keepalive command. Shorter than the smallest
/// allowed keepalive interval, so runs never overlap.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub enum KeepaliveCommandError {
    Blank,
    Exited(Option<i32>),
    TimedOut(Duration),
    Io(std::io::Error),
}

impl fmt::Display for KeepaliveCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => write!(f, "keepalive command is blank"),
            Self::Exited(Some(code)) => write!(f, "keepalive command exited with code {code}"),
            Self::Exited(None) => write!(f, "keepalive command was killed by a signal"),
            Self::TimedOut(limit) => {
                write!(f, "keepalive command still running after {}s", limit.as_secs_f32())
            }
            Self::Io(e) => write!(f, "keepalive command could not start: {e}"),
        }
    }
}

impl std::error::Error for KeepaliveCommandError {}

/// Run `command` through `sh -c` and wait at most `limit` for it.
/// The child is killed if the wait is abandoned.
pub async fn run_keepalive_command(command: &str, limit: Duration) -> Result<(), KeepaliveCommandError> {
    if command.trim().is_empty() {
        return Err(KeepaliveCommandError::Blank);
    }

    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(KeepaliveCommandError::Io)?;

    let status = tokio::time::timeout(limit, child.wait())
        .await
        .map_err(|_| KeepaliveCommandError::TimedOut(limit))?
        .map_err(KeepaliveCommandError::Io)?;

    if status.success() {
        Ok(())
    } else {
        Err(KeepaliveCommandError::Exited(status.code()))
    }
}

/// Run the keepalive command in the background. A failure is reported to
/// the controller as `Event::KeepaliveFailed`; success is silent.
pub fn spawn_keepalive_command(command: String, tx: Sender<ControllerMsg>) -> JoinHandle<()> {
    tokio::spawn(async move {
        linfo!("keepalive", "run: {}", command);

        match run_keepalive_command(&command, COMMAND_TIMEOUT).await {
            Ok(()) => ldebug!("keepalive", "command finished"),
            Err(e) => {
                let msg = ControllerMsg::Event(Event::KeepaliveFailed {
                    reason: e.to_string(),
                    now_ms: now_ms(),
                });
                let _ = tx.send(msg).await;
            }
        }
    })
}
