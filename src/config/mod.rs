// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

use eyre::Result;
use rune_cfg::RuneConfig;

use crate::core::config::Settings;
use crate::ldebug;

/// Default config path: user config, then system config.
/// Returns the user path when neither exists.
pub fn resolve_default_config_path() -> PathBuf {
    let user = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("lapse")
        .join("lapse.rune");

    if user.exists() {
        return user;
    }

    let system = PathBuf::from("/etc/lapse/lapse.rune");
    if system.exists() {
        return system;
    }

    user
}

/// Load settings from the `lapse:` block of a rune config file.
///
/// A missing file is not an error; it yields empty settings so flags alone
/// can drive the countdown.
pub fn load_from_path(path: &Path) -> Result<Settings> {
    if !path.exists() {
        ldebug!("config", "no config at {}; using flags only", path.display());
        return Ok(Settings::default());
    }

    let config = RuneConfig::from_file(path)
        .map_err(|e| eyre::eyre!("failed to load config from {}: {e}", path.display()))?;

    ldebug!("config", "loaded config from {}", path.display());
    Ok(settings_from_rune(&config))
}

fn settings_from_rune(config: &RuneConfig) -> Settings {
    Settings {
        duration: get_string(config, "lapse.duration"),
        when: get_string(config, "lapse.when"),
        keepalive: get_string(config, "lapse.keepalive"),
        keepalive_command: get_string(config, "lapse.keepalive_command"),
        before: get_string(config, "lapse.before"),
        after: get_string(config, "lapse.after"),
        start: get_string(config, "lapse.start"),
        // `end` closes a rune block, so the label lives under `end_word`.
        end: get_string(config, "lapse.end_word"),
    }
}

/// Strings and numbers are both accepted; numbers are validated later.
/// Underscored keys may also be spelled with hyphens.
fn get_string(config: &RuneConfig, key: &str) -> Option<String> {
    let alias = key.replace('_', "-");

    for k in [key, alias.as_str()] {
        if let Ok(s) = config.get::<String>(k) {
            return Some(s);
        }
        // rune stores every number as f64; its Display keeps `1.5` and
        // prints `1800.0` as `1800`.
        if let Ok(n) = config.get::<f64>(k) {
            return Some(n.to_string());
        }
    }

    None
}
