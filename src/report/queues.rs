use std::collections::BTreeMap;

use super::render;
use crate::jobs::JobStatus;
use crate::queues::StateCounts;

pub fn table(queues: &BTreeMap<String, StateCounts>, with_headers: bool) -> String {
    let headers: Vec<String> = std::iter::once("QUEUE".to_string())
        .chain(JobStatus::ALL.iter().map(|s| s.to_string().to_uppercase()))
        .chain(std::iter::once("TOTAL".to_string()))
        .collect();
    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();

    let rows = queues
        .iter()
        .map(|(queue, counts)| {
            std::iter::once(queue.clone())
                .chain(JobStatus::ALL.iter().map(|s| counts.get(*s).to_string()))
                .chain(std::iter::once(counts.total().to_string()))
                .collect::<Vec<String>>()
        })
        .collect();
    render(&headers, rows, with_headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_table() {
        let mut queues = BTreeMap::new();
        queues.insert(
            "q1".to_string(),
            StateCounts {
                idle: 3,
                running: 7,
                ..StateCounts::default()
            },
        );

        let out = table(&queues, true);
        let lines: Vec<Vec<&str>> = out.lines().map(|l| l.split_whitespace().collect()).collect();
        assert_eq!(
            lines[0],
            vec!["QUEUE", "UNSUB", "IDLE", "RUNNING", "REMOVED", "COMPLETED", "HELD", "ERROR", "TOTAL"]
        );
        assert_eq!(lines[1], vec!["q1", "0", "3", "7", "0", "0", "0", "0", "10"]);
    }
}
