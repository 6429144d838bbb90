// Author: Dustin Pilgrim
// License: MIT

use crate::cli::{Args, Command};
use crate::core::config::Config;
use crate::core::duration::{self, DurationResult};
use crate::core::utils::now_ms;

use super::AnyError;

pub async fn run(args: Args) -> Result<(), AnyError> {
    match args.command.clone() {
        Some(Command::Describe { target, now }) => describe(&args, &target, now.as_deref()),
        Some(Command::Watch) | None => super::watch_mode::run(args).await,
    }
}

fn describe(args: &Args, target: &str, now: Option<&str>) -> Result<(), AnyError> {
    crate::log::set_verbose(args.verbose);

    let settings = super::load_settings(args)?;
    let (cfg, _) = Config::from_settings(&settings);

    let now_ms = match now {
        Some(raw) => duration::parse_instant(raw)
            .ok_or_else(|| format!("invalid --now value: {raw:?}"))?,
        None => now_ms(),
    };

    let result = duration::compute(now_ms, duration::parse_instant(target), &cfg.labels);
    println!("{}", render(&result, args.json));
    Ok(())
}

fn render(result: &DurationResult, json: bool) -> String {
    if !json {
        return format!("{} {}", result.prefix_text(), result.duration_text());
    }

    serde_json::json!({
        "prefix": result.prefix_text(),
        "duration": result.duration_text(),
        "is_past": result.is_past,
        "diff_seconds": result.diff_seconds,
        "reschedule_delay_ms": result.reschedule_delay_ms,
        "invalid": result.invalid,
    })
    .to_string()
}
