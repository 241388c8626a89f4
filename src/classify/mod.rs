//! Congestion classification of scheduler queues.

pub mod age;
pub mod pipeline;
pub mod policy;

use serde::Serialize;

use crate::jobs::JobId;

pub use self::pipeline::{Classification, Pipeline};
pub use self::policy::{Reason, Thresholds, Verdict};

/// Per-queue congestion result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetInfo {
    pub is_full: bool,
    /// Saturation score in `[0, 1]`; `None` when not computed.
    pub how_full: Option<f64>,
    pub newest_running_age: Option<u64>,
    pub oldest_idle_age: Option<u64>,
    pub newest_running_job: Option<JobId>,
    pub oldest_idle_job: Option<JobId>,
    pub reason: Reason,
}

impl std::fmt::Display for TargetInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn opt<T: std::fmt::Display>(v: &Option<T>) -> String {
            v.as_ref().map_or_else(|| "None".to_string(), |x| x.to_string())
        }
        write!(
            f,
            "TargetInfo: isfull={}, howfull={}, newestrunning[age]={}, oldestidle[age]={}",
            self.is_full,
            opt(&self.how_full),
            opt(&self.newest_running_age),
            opt(&self.oldest_idle_age),
        )
    }
}
