// Author: Dustin Pilgrim
// License: MIT

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::action::{Action, Signal};
use crate::core::config::{Config, Settings};
use crate::core::controller::{Controller, EXPIRED_FREEZE_SECONDS};
use crate::core::controller::keepalive::AnyError;
use crate::core::error::Error;
use crate::core::events::{Event, InteractionKind};
use crate::core::state::{Phase, State};

const NOW: i64 = 1_000_000_000_000;

fn cfg(duration: &str, keepalive: Option<&str>) -> Config {
    let settings = Settings {
        duration: Some(duration.to_string()),
        keepalive: keepalive.map(str::to_string),
        ..Settings::default()
    };
    let (cfg, errors) = Config::from_settings(&settings);
    assert!(errors.is_empty());
    cfg
}

fn started(cfg: Config, now_ms: i64) -> (Controller, State) {
    let mut ctl = Controller::new(cfg);
    let mut state = State::new(now_ms);
    let _ = ctl.start(&mut state, now_ms);
    (ctl, state)
}

fn tick(ctl: &mut Controller, state: &mut State, now_ms: i64) -> Vec<Action> {
    ctl.handle_event(state, Event::Tick { now_ms }).unwrap()
}

fn interact(ctl: &mut Controller, state: &mut State, now_ms: i64) -> Vec<Action> {
    ctl.handle_event(
        state,
        Event::Interaction {
            kind: InteractionKind::KeyUp,
            now_ms,
        },
    )
    .unwrap()
}

fn expired_signals(actions: &[Action]) -> usize {
    actions
        .iter()
        .filter(|a| **a == Action::Notify(Signal::SessionExpired))
        .count()
}

#[test]
fn start_renders_and_schedules() {
    let mut ctl = Controller::new(cfg("300", None));
    let mut state = State::new(NOW);

    let out = ctl.start(&mut state, NOW);

    assert_eq!(state.target_ms(), Some(NOW + 300_000));
    assert_eq!(out.result.human_text, "5 minutes");
    assert_eq!(out.result.start_word, " in");
    assert_eq!(
        out.actions,
        vec![
            Action::Render {
                prefix: "expires in".to_string(),
                duration: "5 minutes".to_string(),
            },
            Action::Schedule { delay_ms: 1000 },
        ]
    );
    assert_eq!(state.phase(), Phase::Counting);
}

#[test]
fn explicit_when_wins_over_duration() {
    let cfg = cfg("300", None).with_when(Some("2001-09-09T01:56:40Z"));
    let (_ctl, state) = started(cfg, NOW);

    assert_eq!(state.target_ms(), Some(NOW + 600_000));
}

#[test]
fn expiry_transition_fires_once() {
    let (mut ctl, mut state) = started(cfg("5", None), 0);

    let mut fired = 0;
    for now in [1000, 4000, 4999, 5000, 6000, 30_000, 90_000] {
        fired += expired_signals(&tick(&mut ctl, &mut state, now));
    }

    assert_eq!(fired, 1);
    assert_eq!(state.expired_count(), 1);
    assert_eq!(state.phase(), Phase::Expired);
}

#[test]
fn expired_display_counts_up() {
    let (mut ctl, mut state) = started(cfg("5", None), 0);

    let actions = tick(&mut ctl, &mut state, 5000 + 125_000);
    assert_eq!(
        actions[0],
        Action::Render {
            prefix: "expired".to_string(),
            duration: "2 minutes ago".to_string(),
        }
    );
    assert_eq!(actions.last(), Some(&Action::Schedule { delay_ms: 60_000 }));
}

#[test]
fn expired_display_freezes_after_bound() {
    let (mut ctl, mut state) = started(cfg("5", None), 0);
    let target = 5000;
    let bound_ms = EXPIRED_FREEZE_SECONDS as i64 * 1000;

    let actions = tick(&mut ctl, &mut state, target + bound_ms - 1000);
    assert!(matches!(actions.last(), Some(Action::Schedule { .. })));
    assert!(!state.frozen());

    let actions = tick(&mut ctl, &mut state, target + bound_ms);
    assert_eq!(actions.last(), Some(&Action::CancelSchedule));
    assert!(state.frozen());

    // A stray timer after freezing does nothing.
    assert!(tick(&mut ctl, &mut state, target + bound_ms + 5000).is_empty());
}

#[test]
fn unparsable_when_shows_unknown_and_stops() {
    let cfg = cfg("300", None).with_when(Some("next tuesday"));
    let mut ctl = Controller::new(cfg);
    let mut state = State::new(NOW);

    let out = ctl.start(&mut state, NOW);
    assert!(out.result.invalid);
    assert_eq!(
        out.actions,
        vec![
            Action::Render {
                prefix: "expires".to_string(),
                duration: "unknown".to_string(),
            },
            Action::CancelSchedule,
        ]
    );
    assert_eq!(state.phase(), Phase::Invalid);
    assert!(tick(&mut ctl, &mut state, NOW + 1000).is_empty());

    let actions = ctl
        .handle_event(&mut state, Event::ResetRelative { now_ms: NOW + 2000 })
        .unwrap();
    assert_eq!(state.target_ms(), Some(NOW + 302_000));
    assert!(matches!(actions.last(), Some(Action::Schedule { .. })));
}

#[test]
fn relative_reset_without_duration_is_ignored() {
    let mut ctl = Controller::new(Config::disabled());
    let mut state = State::new(NOW);
    state.set_target_ms(Some(NOW + 10_000));

    let res = ctl.handle_event(&mut state, Event::ResetRelative { now_ms: NOW });

    assert_eq!(res, Err(Error::PastTarget));
    assert_eq!(state.target_ms(), Some(NOW + 10_000));
}

#[test]
fn absolute_reset_must_be_in_the_future() {
    let (mut ctl, mut state) = started(cfg("300", None), NOW);

    let res = ctl.reset_absolute(&mut state, NOW, NOW);
    assert_eq!(res, Err(Error::PastTarget));
    assert_eq!(state.target_ms(), Some(NOW + 300_000));

    let res = ctl.handle_event(
        &mut state,
        Event::ResetAbsolute {
            when: "whenever".to_string(),
            now_ms: NOW,
        },
    );
    assert_eq!(res, Err(Error::InvalidTarget("whenever".to_string())));
    assert_eq!(state.target_ms(), Some(NOW + 300_000));

    let actions = ctl
        .handle_event(
            &mut state,
            Event::ResetAbsolute {
                when: "2001-09-09T02:46:40Z".to_string(),
                now_ms: NOW,
            },
        )
        .unwrap();
    assert_eq!(state.target_ms(), Some(NOW + 3_600_000));
    assert_eq!(
        actions[0],
        Action::Render {
            prefix: "expires in".to_string(),
            duration: "60 minutes".to_string(),
        }
    );
}

#[test]
fn reset_after_expiry_rearms_transition() {
    let (mut ctl, mut state) = started(cfg("5", None), 0);

    let mut fired = expired_signals(&tick(&mut ctl, &mut state, 6000));

    let actions = ctl.reset_relative(&mut state, 7000).unwrap();
    fired += expired_signals(&actions);
    assert_eq!(state.target_ms(), Some(12_000));
    assert_eq!(state.phase(), Phase::Counting);

    fired += expired_signals(&tick(&mut ctl, &mut state, 12_000));
    fired += expired_signals(&tick(&mut ctl, &mut state, 13_000));

    assert_eq!(fired, 2);
}

#[test]
fn keepalive_throttled_by_threshold() {
    let (mut ctl, mut state) = started(cfg("1800", Some("90")), 0);

    let mut signals = Vec::new();
    for now in [0, 50_000, 100_000] {
        signals.extend(interact(&mut ctl, &mut state, now));
    }

    assert_eq!(signals, vec![Action::Notify(Signal::Keepalive)]);
    assert_eq!(state.last_keepalive_ms(), 100_000);
    assert_eq!(state.last_interaction_ms(), 100_000);
}

#[test]
fn keepalive_never_fires_at_or_below_floor() {
    for threshold in ["20", "30"] {
        let (mut ctl, mut state) = started(cfg("1800", Some(threshold)), 0);

        let mut signals = Vec::new();
        for now in (0..600_000).step_by(1000) {
            signals.extend(interact(&mut ctl, &mut state, now));
        }

        assert!(signals.is_empty(), "threshold {threshold}");
        assert_eq!(state.keepalive_count(), 0);
    }
}

#[test]
fn custom_keepalive_replaces_default_signal() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();

    let mut ctl = Controller::default();
    ctl.configure(
        cfg("1800", Some("60")),
        Some(Box::new(move || -> Result<(), AnyError> {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })),
    );
    let mut state = State::new(0);
    let _ = ctl.start(&mut state, 0);

    assert!(interact(&mut ctl, &mut state, 61_000).is_empty());
    assert!(interact(&mut ctl, &mut state, 62_000).is_empty());
    assert!(interact(&mut ctl, &mut state, 122_000).is_empty());

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(ctl.has_custom_keepalive());
}

#[test]
fn failing_keepalive_handler_is_disabled() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();

    let mut ctl = Controller::default();
    ctl.configure(
        cfg("1800", Some("60")),
        Some(Box::new(move || -> Result<(), AnyError> {
            seen.fetch_add(1, Ordering::SeqCst);
            Err("backend unreachable".into())
        })),
    );
    let mut state = State::new(0);
    let _ = ctl.start(&mut state, 0);

    assert_eq!(
        interact(&mut ctl, &mut state, 61_000),
        vec![Action::Notify(Signal::Keepalive)]
    );
    assert!(ctl.keepalive_failed());
    assert!(!ctl.has_custom_keepalive());

    assert_eq!(
        interact(&mut ctl, &mut state, 122_000),
        vec![Action::Notify(Signal::Keepalive)]
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Stays disabled across reconfiguration.
    ctl.configure(
        cfg("1800", Some("60")),
        Some(Box::new(|| -> Result<(), AnyError> { Ok(()) })),
    );
    assert!(!ctl.has_custom_keepalive());
}

#[test]
fn teardown_is_safe_without_start() {
    let mut ctl = Controller::new(cfg("300", None));
    let mut state = State::new(NOW);

    assert_eq!(ctl.teardown(&mut state), vec![Action::CancelSchedule]);
    assert_eq!(ctl.teardown(&mut state), vec![Action::CancelSchedule]);
    assert!(tick(&mut ctl, &mut state, NOW).is_empty());
}

#[test]
fn teardown_stops_ticks() {
    let (mut ctl, mut state) = started(cfg("300", None), NOW);

    assert_eq!(ctl.teardown(&mut state), vec![Action::CancelSchedule]);
    assert!(!state.started());
    assert!(tick(&mut ctl, &mut state, NOW + 1000).is_empty());
}

fn with_command(keepalive: &str, command: &str) -> Config {
    let (cfg, errors) = Config::from_settings(&Settings {
        duration: Some("1800".to_string()),
        keepalive: Some(keepalive.to_string()),
        keepalive_command: Some(command.to_string()),
        ..Settings::default()
    });
    assert!(errors.is_empty());
    cfg
}

#[test]
fn keepalive_command_is_handed_to_the_host() {
    let (mut ctl, mut state) = started(with_command("60", "ping-session"), 0);

    assert_eq!(
        interact(&mut ctl, &mut state, 61_000),
        vec![Action::RunKeepalive {
            command: "ping-session".to_string()
        }]
    );
    assert!(interact(&mut ctl, &mut state, 90_000).is_empty());
    assert!(ctl.has_custom_keepalive());
}

#[test]
fn reported_command_failure_falls_back_to_default_signal() {
    let (mut ctl, mut state) = started(with_command("60", "false"), 0);
    let _ = interact(&mut ctl, &mut state, 61_000);

    let actions = ctl
        .handle_event(
            &mut state,
            Event::KeepaliveFailed {
                reason: "keepalive command exited with code 1".to_string(),
                now_ms: 61_500,
            },
        )
        .unwrap();

    assert_eq!(actions, vec![Action::Notify(Signal::Keepalive)]);
    assert!(ctl.keepalive_failed());
    assert!(!ctl.has_custom_keepalive());

    // Later keepalives use the default signal; the command never runs again.
    assert_eq!(
        interact(&mut ctl, &mut state, 130_000),
        vec![Action::Notify(Signal::Keepalive)]
    );

    ctl.configure(with_command("60", "ping-session"), None);
    assert!(!ctl.has_custom_keepalive());
}

#[test]
fn enormous_threshold_still_throttles() {
    let (mut ctl, mut state) = started(cfg("1800", Some("1e19")), 0);

    assert!(interact(&mut ctl, &mut state, NOW).is_empty());
    assert_eq!(state.keepalive_count(), 0);
}
