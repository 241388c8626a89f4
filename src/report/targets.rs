use std::collections::BTreeMap;

use super::{cell, render};
use crate::classify::TargetInfo;

pub const HEADERS: [&str; 6] = [
    "QUEUE",
    "ISFULL",
    "HOWFULL",
    "NEWEST_RUNNING_AGE",
    "OLDEST_IDLE_AGE",
    "REASON",
];

pub fn table(targets: &BTreeMap<String, TargetInfo>, with_headers: bool) -> String {
    let rows = targets
        .iter()
        .map(|(queue, info)| {
            vec![
                queue.clone(),
                info.is_full.to_string(),
                cell(info.how_full.map(|h| format!("{:.2}", h))),
                cell(info.newest_running_age),
                cell(info.oldest_idle_age),
                info.reason.to_string(),
            ]
        })
        .collect();
    render(&HEADERS, rows, with_headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Reason;

    #[test]
    fn test_targets_table() {
        let mut targets = BTreeMap::new();
        targets.insert(
            "A".to_string(),
            TargetInfo {
                is_full: true,
                how_full: None,
                newest_running_age: Some(500),
                oldest_idle_age: Some(400),
                newest_running_job: None,
                oldest_idle_job: None,
                reason: Reason::Starved,
            },
        );
        targets.insert(
            "C".to_string(),
            TargetInfo {
                is_full: false,
                how_full: None,
                newest_running_age: Some(10_000),
                oldest_idle_age: None,
                newest_running_job: None,
                oldest_idle_job: None,
                reason: Reason::NoIdle,
            },
        );

        let out = table(&targets, false);
        let lines: Vec<Vec<&str>> = out.lines().map(|l| l.split_whitespace().collect()).collect();
        assert_eq!(lines[0], vec!["A", "true", "-", "500", "400", "starved"]);
        assert_eq!(lines[1], vec!["C", "false", "-", "10000", "-", "no-idle"]);
    }
}
