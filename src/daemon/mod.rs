// Author: Dustin Pilgrim
// License: MIT

mod actions;
mod run;


use crate::core::{
    config::Config,
    controller::{Controller, KeepaliveHandler},
    error::Error,
    state::State,
    utils::now_ms,
};
use crate::services::{
    display::{DisplaySink, NotificationChannel},
    input::{InteractionSource, Subscription},
    timer::TimerSlot,
};
use crate::{lerror, lwarn};

use tokio::task::JoinHandle;

pub type AnyError = Box<dyn std::error::Error + Send + Sync>;

/// Hosts one controller: owns its timer slot, its interaction
/// subscription and the sinks its actions land on.
pub struct Daemon {
    controller: Controller,
    state: State,

    display: Box<dyn DisplaySink>,
    notifier: Box<dyn NotificationChannel>,
    source: Box<dyn InteractionSource>,

    timer: TimerSlot,
    subscription: Option<Subscription>,
    keepalive_task: Option<JoinHandle<()>>,
}

impl Daemon {
    pub fn new(
        cfg: Config,
        keepalive: Option<Box<dyn KeepaliveHandler>>,
        display: Box<dyn DisplaySink>,
        notifier: Box<dyn NotificationChannel>,
        source: Box<dyn InteractionSource>,
    ) -> Self {
        let mut controller = Controller::default();
        controller.configure(cfg, keepalive);

        Self {
            controller,
            state: State::new(now_ms()),
            display,
            notifier,
            source,
            timer: TimerSlot::new(),
            subscription: None,
            keepalive_task: None,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    pub fn timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// Cancel the pending timer, stop a running keepalive command and
    /// detach the interaction source.
    /// Safe to call more than once, and before `run`.
    pub fn teardown(&mut self) {
        let actions = self.controller.teardown(&mut self.state);
        for action in actions {
            self.exec_action(action, None);
        }

        self.timer.cancel();

        if let Some(task) = self.keepalive_task.take() {
            task.abort();
        }

        if let Some(mut sub) = self.subscription.take() {
            sub.unsubscribe();
            self.display.finish();
        }
    }

    fn log_controller_error(e: &Error) {
        if e.is_warning() {
            lwarn!("daemon", "{} (ignored)", e);
        } else {
            lerror!("daemon", "{}", e);
        }
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        self.teardown();
    }
}
