// Author: Dustin Pilgrim
// License: MIT

pub mod command;
pub mod watch_mode;

use crate::cli::Args;
use crate::core::config::Settings;
use crate::{lerror, lwarn};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

fn init_logging(args: &Args) {
    crate::log::set_verbose(args.verbose);

    if args.no_log_file {
        return;
    }

    let path = crate::log::log_path();
    if let Err(e) = crate::log::enable_file_output(&path) {
        lwarn!("lapse", "failed to enable file logging at {}: {}", path.display(), e);
    }
}

/// Config file values with command-line flags layered on top.
fn load_settings(args: &Args) -> Result<Settings, AnyError> {
    let path = match args.config.as_deref() {
        Some(p) => p.to_path_buf(),
        None => crate::config::resolve_default_config_path(),
    };

    let file = crate::config::load_from_path(&path).map_err(|e| {
        lerror!("config", "{}", e);
        Box::<dyn std::error::Error + Send + Sync>::from(e.to_string())
    })?;

    Ok(file.overlay(args.session.to_settings()))
}
