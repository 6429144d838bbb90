// Author: Dustin Pilgrim
// License: MIT

use crate::core::controller_msg::ControllerMsg;
use crate::core::events::{Event, InteractionKind};
use crate::core::utils::now_ms;
use crate::{ldebug, lerror, linfo};

use std::io::BufRead;

use tokio::sync::mpsc::{self, Sender};
use tokio::task::JoinHandle;

/// Something that produces interaction and reset requests for a controller.
pub trait InteractionSource: Send {
    fn subscribe(&mut self, tx: Sender<ControllerMsg>) -> Subscription;
}

/// Handle to a live subscription. Unsubscribing (or dropping) detaches it.
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self { handle: Some(handle) }
    }

    pub fn unsubscribe(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Line-oriented control over stdin.
///
/// ```text
/// <enter> / any text     key-up interaction
/// focus|blur|scroll|click  typed interaction
/// reset                  relative reset
/// reset <date-time>      absolute reset
/// quit                   stop
/// ```
pub struct StdinSource;

impl InteractionSource for StdinSource {
    fn subscribe(&mut self, tx: Sender<ControllerMsg>) -> Subscription {
        forward_lines(std::io::BufReader::new(std::io::stdin()), tx)
    }
}

/// Feed every line of `reader` through `parse_line` into `tx`.
///
/// Reads block on a detached thread that is never joined. The returned
/// subscription owns only the forwarding task, so unsubscribing returns
/// at once; the thread exits at its next line or at end of input.
pub fn forward_lines<R>(reader: R, tx: Sender<ControllerMsg>) -> Subscription
where
    R: BufRead + Send + 'static,
{
    let (line_tx, mut line_rx) = mpsc::channel::<String>(16);

    let spawned = std::thread::Builder::new()
        .name("lapse-input".to_string())
        .spawn(move || {
            for line in reader.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        linfo!("input", "read failed: {}", e);
                        break;
                    }
                };
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });

    if let Err(e) = spawned {
        lerror!("input", "failed to start input reader: {}", e);
    }

    Subscription::new(tokio::spawn(async move {
        while let Some(line) = line_rx.recv().await {
            if tx.send(parse_line(&line, now_ms())).await.is_err() {
                return;
            }
        }
        ldebug!("input", "input closed; no more interactions");
    }))
}

pub fn parse_line(line: &str, now_ms: i64) -> ControllerMsg {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let interaction = |kind| ControllerMsg::Event(Event::Interaction { kind, now_ms });

    match word.to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => ControllerMsg::Stop {
            reason: "quit requested".to_string(),
        },
        "reset" if rest.is_empty() => ControllerMsg::Event(Event::ResetRelative { now_ms }),
        "reset" => ControllerMsg::Event(Event::ResetAbsolute {
            when: rest.to_string(),
            now_ms,
        }),
        "focus" => interaction(InteractionKind::Focus),
        "blur" => interaction(InteractionKind::Blur),
        "scroll" => interaction(InteractionKind::Scroll),
        "click" | "pointer" | "pointerdown" => interaction(InteractionKind::PointerDown),
        _ => interaction(InteractionKind::KeyUp),
    }
}
