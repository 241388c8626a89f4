//! Threshold policy deciding whether a queue is full.

use serde::{Deserialize, Serialize};

/// An idle job waiting at least this long is evidence of saturation.
pub const IDLE_STALE_SECONDS: u64 = 360;
/// A job started within this long means the queue is still draining.
pub const RECENT_START_SECONDS: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub idle_stale_seconds: u64,
    pub recent_start_seconds: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            idle_stale_seconds: IDLE_STALE_SECONDS,
            recent_start_seconds: RECENT_START_SECONDS,
        }
    }
}

/// Which rule settled the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Nothing is waiting.
    NoIdle,
    /// The oldest idle job has not waited past the stale threshold.
    IdleFresh,
    /// A job started recently, so matching is still happening.
    RecentStart,
    /// Stale idle job and no recent start.
    Starved,
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reason::NoIdle => write!(f, "no-idle"),
            Reason::IdleFresh => write!(f, "idle-fresh"),
            Reason::RecentStart => write!(f, "recent-start"),
            Reason::Starved => write!(f, "starved"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub is_full: bool,
    pub reason: Reason,
}

impl Thresholds {
    /// Apply the rules in order; the first one that matches decides.
    pub fn classify(&self, oldest_idle_age: Option<u64>, newest_running_age: Option<u64>) -> Verdict {
        let reason = match (oldest_idle_age, newest_running_age) {
            (None, _) => Reason::NoIdle,
            (Some(idle), _) if idle <= self.idle_stale_seconds => Reason::IdleFresh,
            (_, Some(running)) if running < self.recent_start_seconds => Reason::RecentStart,
            _ => Reason::Starved,
        };
        Verdict {
            is_full: reason == Reason::Starved,
            reason,
        }
    }

    pub fn is_full(&self, oldest_idle_age: Option<u64>, newest_running_age: Option<u64>) -> bool {
        self.classify(oldest_idle_age, newest_running_age).is_full
    }

    /// Continuous saturation score in `[0, 1]`, `1.0` meaning saturated.
    /// Not computed yet: always `None`, which callers must not read as `0.0`.
    pub fn how_full(&self, _oldest_idle_age: Option<u64>, _newest_running_age: Option<u64>) -> Option<f64> {
        None
    }
}
