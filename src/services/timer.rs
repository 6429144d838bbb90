// Author: Dustin Pilgrim
// License: MIT

use crate::core::controller_msg::ControllerMsg;
use crate::core::events::Event;
use crate::core::utils::now_ms;
use crate::ldebug;

use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};

/// The one re-schedule timer a controller may have pending.
///
/// Arming replaces whatever was pending; dropping the slot cancels it.
pub struct TimerSlot {
    handle: Option<JoinHandle<()>>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Deliver a `Tick` on `tx` after `delay`.
    pub fn arm(&mut self, delay: Duration, tx: Sender<ControllerMsg>) {
        self.cancel();

        self.handle = Some(tokio::spawn(async move {
            sleep(delay).await;

            let now_ms = now_ms();
            // If the run loop is gone there is nobody left to tick.
            if tx.send(ControllerMsg::Event(Event::Tick { now_ms })).await.is_err() {
                ldebug!("timer", "tick dropped (receiver closed)");
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for TimerSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    #[tokio::test]
    async fn fires_once_after_delay() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut slot = TimerSlot::new();

        slot.arm(Duration::from_millis(10), tx);
        assert!(slot.is_armed());

        let msg = timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
        assert!(matches!(msg, Some(ControllerMsg::Event(Event::Tick { .. }))));
    }

    #[tokio::test]
    async fn rearming_replaces_pending_timer() {
        let (tx, mut rx) = mpsc::channel(8);
        let _keep_open = tx.clone();
        let mut slot = TimerSlot::new();

        slot.arm(Duration::from_millis(50), tx.clone());
        slot.arm(Duration::from_millis(10), tx);

        let first = timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
        assert!(first.is_some());

        // The replaced 50ms timer never delivers.
        let second = timeout(Duration::from_millis(200), rx.recv()).await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn cancel_is_idempotent() {
        let (tx, mut rx) = mpsc::channel(8);
        let _keep_open = tx.clone();
        let mut slot = TimerSlot::new();

        slot.cancel();
        slot.arm(Duration::from_millis(20), tx);
        slot.cancel();
        slot.cancel();
        assert!(!slot.is_armed());

        let msg = timeout(Duration::from_millis(150), rx.recv()).await;
        assert!(msg.is_err());
    }
}
