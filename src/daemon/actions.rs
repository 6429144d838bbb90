// Author: Dustin Pilgrim
// License: MIT

use crate::core::{action::Action, controller_msg::ControllerMsg};
use crate::services::keepalive;
use crate::{ldebug, linfo};

use tokio::sync::mpsc;
use tokio::time::Duration;

use super::Daemon;

impl Daemon {
    /// `tx` is where armed timers and keepalive commands report back;
    /// without it both are no-ops (only teardown runs without a channel).
    pub(super) fn exec_action(&mut self, action: Action, tx: Option<&mpsc::Sender<ControllerMsg>>) {
        match action {
            Action::Render { prefix, duration } => {
                self.display.render(&prefix, &duration);
            }

            Action::Notify(signal) => {
                linfo!("daemon", "notify: {}", signal.name());
                self.notifier.notify(signal);
            }

            Action::RunKeepalive { command } => {
                let Some(tx) = tx else {
                    return;
                };
                if let Some(previous) = self.keepalive_task.take() {
                    previous.abort();
                }
                self.keepalive_task = Some(keepalive::spawn_keepalive_command(command, tx.clone()));
            }

            Action::Schedule { delay_ms } => {
                let Some(tx) = tx else {
                    return;
                };
                ldebug!("daemon", "next tick in {}ms", delay_ms);
                self.timer.arm(Duration::from_millis(delay_ms), tx.clone());
            }

            Action::CancelSchedule => {
                self.timer.cancel();
            }
        }
    }
}
