// Author: Dustin Pilgrim
// License: MIT

use crate::core::{controller_msg::ControllerMsg, utils::now_ms};
use crate::{ldebug, linfo};

use tokio::sync::{mpsc, watch};

use super::{AnyError, Daemon};

impl Daemon {
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), AnyError> {
        linfo!("daemon", "starting");

        let (tx, mut rx) = mpsc::channel::<ControllerMsg>(64);

        self.subscription = Some(self.source.subscribe(tx.clone()));

        let first = self.controller.start(&mut self.state, now_ms());
        for action in first.actions {
            self.exec_action(action, Some(&tx));
        }

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        linfo!("daemon", "stopping (shutdown requested)");
                        break;
                    }
                }

                maybe = rx.recv() => {
                    let Some(msg) = maybe else {
                        linfo!("daemon", "stopping (event channel closed)");
                        break;
                    };

                    match msg {
                        ControllerMsg::Event(event) => {
                            ldebug!("daemon", "incoming: {:?}", event);

                            match self.controller.handle_event(&mut self.state, event) {
                                Ok(actions) => {
                                    for action in actions {
                                        self.exec_action(action, Some(&tx));
                                    }
                                }
                                Err(e) => Self::log_controller_error(&e),
                            }
                        }

                        ControllerMsg::Stop { reason } => {
                            linfo!("daemon", "stopping ({})", reason);
                            break;
                        }
                    }
                }
            }
        }

        self.teardown();
        Ok(())
    }
}
