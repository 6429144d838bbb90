// Author: Dustin Pilgrim
// License: MIT

use crate::cli::Args;
use crate::core::config::Config;
use crate::daemon::Daemon;
use crate::services::display::{TerminalDisplay, TerminalNotifier};
use crate::services::input::StdinSource;
use crate::{ldebug, linfo, lwarn};

use super::AnyError;

pub async fn run(args: Args) -> Result<(), AnyError> {
    super::init_logging(&args);
    linfo!("lapse", "starting");

    let settings = super::load_settings(&args)?;

    let (cfg, errors) = Config::from_settings(&settings);
    for e in &errors {
        lwarn!("config", "{}", e);
    }
    ldebug!(
        "config",
        "duration={}ms when={:?} keepalive={}s command={:?}",
        cfg.duration_ms,
        cfg.when,
        cfg.keepalive_threshold_seconds,
        cfg.keepalive_command
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let mut daemon = Daemon::new(
        cfg,
        None,
        Box::new(TerminalDisplay::new()),
        Box::new(TerminalNotifier::new(args.json)),
        Box::new(StdinSource),
    );

    let mut daemon_task = tokio::spawn(async move { daemon.run(shutdown_rx).await });

    tokio::select! {
        res = &mut daemon_task => {
            match res {
                Ok(result) => result,
                Err(join_err) => Err(Box::new(join_err) as AnyError),
            }
        }

        _ = tokio::signal::ctrl_c() => {
            linfo!("lapse", "received Ctrl+C, shutting down");
            let _ = shutdown_tx.send(true);

            match daemon_task.await {
                Ok(result) => result,
                Err(join_err) => Err(Box::new(join_err)),
            }
        }
    }
}
