//! Reduction of a queue's records to one representative job.
//!
//! Both reductions are stable: on equal timestamps the first record
//! encountered wins.

use crate::jobs::JobRecord;

/// The most recently started record: maximum `entered_current_status`.
pub fn newest<'a, I>(records: I) -> Option<&'a JobRecord>
where
    I: IntoIterator<Item = &'a JobRecord>,
{
    records.into_iter().fold(None, |best, r| match best {
        Some(b) if r.entered_current_status <= b.entered_current_status => Some(b),
        _ => Some(r),
    })
}

/// The longest-waiting record: minimum `entered_current_status`.
pub fn oldest<'a, I>(records: I) -> Option<&'a JobRecord>
where
    I: IntoIterator<Item = &'a JobRecord>,
{
    records.into_iter().fold(None, |best, r| match best {
        Some(b) if r.entered_current_status >= b.entered_current_status => Some(b),
        _ => Some(r),
    })
}
