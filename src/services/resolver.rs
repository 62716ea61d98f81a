/// Launch time resolution.
///
/// The backend introduced several near-synonymous time fields over its
/// lifetime. Rather than migrating historical records, the authoritative
/// moment of a launch is the first present field in [`LAUNCH_TIME_PRECEDENCE`].
use crate::domain::{Launch, LaunchTiming};
use crate::utils::{first_present, format_launch_time, parse_timestamp, FieldAccessor};
use chrono::{DateTime, Utc};

/// Liftoff, window open (both spellings), generic date, record creation.
pub const LAUNCH_TIME_PRECEDENCE: &[FieldAccessor<LaunchTiming>] = &[
    |t| t.t0.as_deref(),
    |t| t.window_open.as_deref(),
    |t| t.win_open.as_deref(),
    |t| t.date.as_deref(),
    |t| t.created_at.as_deref(),
];

/// Timestamp string treated as the launch's authoritative moment
pub fn resolve_launch_time(launch: &Launch) -> Option<&str> {
    resolve_timing(&launch.timing)
}

pub fn resolve_timing(timing: &LaunchTiming) -> Option<&str> {
    first_present(timing, LAUNCH_TIME_PRECEDENCE)
}

/// Resolved and parsed; `None` when nothing resolves or the text is unparseable
pub fn resolved_instant(launch: &Launch) -> Option<DateTime<Utc>> {
    resolve_launch_time(launch).and_then(parse_timestamp)
}

/// Backend display string when present, else the resolved time formatted locally
pub fn display_time(launch: &Launch) -> String {
    if let Some(preformatted) = launch.timing.date_str.as_deref() {
        return preformatted.to_string();
    }
    resolved_instant(launch)
        .map(|dt| format_launch_time(&dt))
        .unwrap_or_else(|| "TBD".to_string())
}
