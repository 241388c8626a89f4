use super::{cell, render};
use crate::slots::Slot;

pub const HEADERS: [&str; 10] = [
    "NAME",
    "SLOTID",
    "STATE",
    "ACTIVITY",
    "NODETYPE",
    "LOADAVG",
    "REMOTEGROUP",
    "EC2INSTANCEID",
    "EC2PUBLICDNS",
    "EC2AMIID",
];

/// Dynamic slots are indented under their partitionable parent.
const DYNAMIC_INDENT: &str = "      ";

pub fn table(slots: &[Slot], with_headers: bool) -> String {
    let rows = slots
        .iter()
        .map(|slot| {
            let name = if slot.dynamic {
                format!("{}{}", DYNAMIC_INDENT, slot.machine_name())
            } else {
                slot.machine_name()
            };
            vec![
                name,
                cell(slot.slot_id.as_deref()),
                cell(slot.state.as_deref()),
                cell(slot.activity.as_deref()),
                cell(slot.node_type.as_deref()),
                cell(slot.load_avg.as_deref()),
                cell(slot.remote_group.as_deref()),
                cell(slot.ec2_instance_id.as_deref()),
                cell(slot.ec2_public_dns.as_deref()),
                cell(slot.ec2_ami_id.as_deref()),
            ]
        })
        .collect();
    render(&HEADERS, rows, with_headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(name: &str, dynamic: bool) -> Slot {
        Slot {
            name: name.to_string(),
            dynamic,
            slot_id: Some("1".to_string()),
            state: Some("Claimed".to_string()),
            activity: Some("Busy".to_string()),
            node_type: None,
            load_avg: Some("1.0".to_string()),
            remote_group: None,
            ec2_instance_id: None,
            ec2_public_dns: None,
            ec2_ami_id: None,
        }
    }

    #[test]
    fn test_dynamic_slots_are_indented() {
        let out = table(&[slot("slot1@wn001", false), slot("slot1_1@wn001", true)], false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let indent = |line: &str| line.len() - line.trim_start().len();
        assert_eq!(indent(lines[1]), indent(lines[0]) + DYNAMIC_INDENT.len());
        assert!(lines[1].trim_start().starts_with("wn001:slot1_1"));
    }

    #[test]
    fn test_slot_columns() {
        let out = table(&[slot("slot1@wn001", false)], true);
        let lines: Vec<Vec<&str>> = out.lines().map(|l| l.split_whitespace().collect()).collect();
        assert_eq!(lines[0].len(), HEADERS.len());
        assert_eq!(lines[1], vec!["wn001:slot1", "1", "Claimed", "Busy", "-", "1.0", "-", "-", "-", "-"]);
    }
}
