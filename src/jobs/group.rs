//! Partitioning of job records by queue key.

use indexmap::IndexMap;

use crate::jobs::JobRecord;

/// Records indexed by queue key, in first-seen key order.
pub type Groups = IndexMap<String, Vec<JobRecord>>;

/// Partition `records` by `key_fn`. Every record lands in exactly one group
/// and keeps its relative order; no empty groups are created.
pub fn group_by<F>(records: Vec<JobRecord>, key_fn: F) -> Groups
where
    F: Fn(&JobRecord) -> &str,
{
    let mut groups = Groups::new();
    for record in records {
        let key = key_fn(&record);
        match groups.get_mut(key) {
            Some(group) => group.push(record),
            None => {
                let key = key.to_string();
                groups.insert(key, vec![record]);
            }
        }
    }
    groups
}

/// Group by the record's own queue key.
pub fn group_by_queue(records: Vec<JobRecord>) -> Groups {
    group_by(records, |r| r.queue_key.as_str())
}
