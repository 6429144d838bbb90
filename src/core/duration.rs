// Author: Dustin Pilgrim
// License: MIT

use chrono::{DateTime, NaiveDateTime, Utc};

/// Unit thresholds in seconds, largest first. The first one strictly
/// exceeded by the difference selects the displayed unit.
const UNITS: [(u64, &str); 6] = [
    (31_557_600, "year"),
    (2_629_800, "month"),
    (604_800, "week"),
    (86_400, "day"),
    (3_600, "hour"),
    (60, "minute"),
];

/// Presentation fragments chosen by direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub before: String,
    pub after: String,
    pub start: String,
    pub end: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            before: "expires".to_string(),
            after: "expired".to_string(),
            start: "in".to_string(),
            end: "ago".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationResult {
    pub human_text: String,
    pub is_past: bool,
    pub diff_seconds: u64,
    pub prefix_label: String,
    pub start_word: String,
    pub end_word: String,
    pub reschedule_delay_ms: u64,
    pub invalid: bool,
}

impl DurationResult {
    fn unknown(labels: &Labels) -> Self {
        Self {
            human_text: "unknown".to_string(),
            is_past: false,
            diff_seconds: 0,
            prefix_label: labels.before.clone(),
            start_word: String::new(),
            end_word: String::new(),
            reschedule_delay_ms: 0,
            invalid: true,
        }
    }

    /// Text for the leading part of the display ("expires in").
    pub fn prefix_text(&self) -> String {
        format!("{}{}", self.prefix_label, self.start_word)
    }

    /// Text for the trailing part of the display ("5 minutes ago").
    pub fn duration_text(&self) -> String {
        format!("{}{}", self.human_text, self.end_word)
    }
}

/// Turn the distance between `now_ms` and `target_ms` into display text and
/// the delay until that text next changes.
///
/// `target_ms == None` is an instant that could not be parsed.
pub fn compute(now_ms: i64, target_ms: Option<i64>, labels: &Labels) -> DurationResult {
    let Some(target_ms) = target_ms else {
        return DurationResult::unknown(labels);
    };

    let is_past = target_ms <= now_ms;
    let diff = if is_past {
        (now_ms as i128 - target_ms as i128) / 1000
    } else {
        (target_ms as i128 - now_ms as i128) / 1000
    };
    let diff = u64::try_from(diff).unwrap_or(u64::MAX);

    let (unit, value, threshold) = UNITS
        .iter()
        .find(|(threshold, _)| diff > *threshold)
        .map(|(threshold, unit)| (*unit, diff / threshold, *threshold))
        .unwrap_or(("second", diff, 1));

    let extra = diff % threshold;
    let mut reschedule_secs = if !is_past && extra > 0 { extra } else { threshold };

    // A full minute of stale display is never acceptable near a boundary.
    if !is_past && diff != 0 && reschedule_secs % 60 == 0 {
        reschedule_secs = 1;
    }

    let human_text = if diff == 0 {
        "now".to_string()
    } else if value == 1 {
        format!("{value} {unit}")
    } else {
        format!("{value} {unit}s")
    };

    let (prefix_label, start_word, end_word) = if is_past {
        let end_word = if diff != 0 {
            format!(" {}", labels.end)
        } else {
            String::new()
        };
        (labels.after.clone(), String::new(), end_word)
    } else {
        let start_word = if diff != 0 {
            format!(" {}", labels.start)
        } else {
            String::new()
        };
        (labels.before.clone(), start_word, String::new())
    };

    DurationResult {
        human_text,
        is_past,
        diff_seconds: diff,
        prefix_label,
        start_word,
        end_word,
        reschedule_delay_ms: reschedule_secs.saturating_mul(1000),
        invalid: false,
    }
}

/// Parse a date-time string into epoch milliseconds.
///
/// Accepts RFC 3339 (`2026-10-16T12:00:00Z`, offsets included), naive
/// ISO 8601 date-times (read as UTC), and bare numeric millisecond stamps.
pub fn parse_instant(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(ms) = s.parse::<i64>() {
        return Some(ms);
    }

    if let Ok(ms) = s.parse::<f64>() {
        return instant_from_f64(ms);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    None
}

/// Non-finite numbers are not instants.
pub fn instant_from_f64(ms: f64) -> Option<i64> {
    if ms.is_finite() { Some(ms.trunc() as i64) } else { None }
}

/// Render an epoch-millisecond instant for logs.
pub fn format_instant(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| format!("{ms}ms"))
}
