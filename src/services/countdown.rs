/// Countdown to a launch's resolved time
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Non-negative time remaining; days are unbounded (no month/year component)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    pub const ZERO: Countdown = Countdown {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Remaining time from `now` to `target`, all zero once the target has passed
    pub fn between(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_millis((target - now).num_milliseconds())
    }

    /// Countdown for a remaining duration
    pub fn remaining(left: Duration) -> Self {
        Self::from_millis(i64::try_from(left.as_millis()).unwrap_or(i64::MAX))
    }

    fn from_millis(delta: i64) -> Self {
        if delta <= 0 {
            return Self::ZERO;
        }
        Self {
            days: delta / DAY_MS,
            hours: (delta % DAY_MS) / HOUR_MS,
            minutes: (delta % HOUR_MS) / MINUTE_MS,
            seconds: (delta % MINUTE_MS) / SECOND_MS,
        }
    }

    /// Unknown targets count as already passed.
    pub fn until(target: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        target.map_or(Self::ZERO, |t| Self::between(t, now))
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Recomputes a countdown on a fixed cadence until dropped.
///
/// The target is pinned to a runtime deadline at spawn, so remaining time
/// follows the tokio clock. Each ticker owns its task; dropping the ticker
/// aborts it.
#[derive(Debug)]
pub struct CountdownTicker {
    rx: watch::Receiver<Countdown>,
    task: JoinHandle<()>,
}

impl CountdownTicker {
    pub fn spawn(target: Option<DateTime<Utc>>, period: Duration) -> Self {
        let deadline = target.and_then(|t| {
            let left = (t - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            Instant::now().checked_add(left)
        });
        let current = move || match deadline {
            Some(deadline) => {
                Countdown::remaining(deadline.saturating_duration_since(Instant::now()))
            }
            // past the clock's range
            None => Countdown::until(target, Utc::now()),
        };
        let (tx, rx) = watch::channel(current());

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // first tick completes immediately; the initial value is already published
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(current()).is_err() {
                    debug!("countdown ticker has no receivers, stopping");
                    break;
                }
            }
        });

        Self { rx, task }
    }

    /// Wait for the next tick; `None` once the ticker task has stopped
    pub async fn changed(&mut self) -> Option<Countdown> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
