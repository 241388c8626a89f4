//! Startd slot ads, as listed by `condor_status`.

use serde::Serialize;
use tracing::warn;

use crate::jobs::normalize::{text, NormalizeError};
use crate::snapshot::{RawRecord, Snapshot};

const NAME: &str = "Name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    /// `slot@machine`, as advertised.
    pub name: String,
    /// Carved out of a partitionable slot.
    pub dynamic: bool,
    pub slot_id: Option<String>,
    pub state: Option<String>,
    pub activity: Option<String>,
    pub node_type: Option<String>,
    pub load_avg: Option<String>,
    pub remote_group: Option<String>,
    pub ec2_instance_id: Option<String>,
    pub ec2_public_dns: Option<String>,
    pub ec2_ami_id: Option<String>,
}

impl Slot {
    pub fn from_ad(raw: &RawRecord) -> Result<Self, NormalizeError> {
        let name = text(raw, NAME).ok_or_else(|| NormalizeError::MissingField {
            field: NAME.to_string(),
        })?;
        let dynamic = text(raw, "SlotType").is_some_and(|t| t.eq_ignore_ascii_case("dynamic"));

        Ok(Self {
            name,
            dynamic,
            slot_id: text(raw, "SlotID"),
            state: text(raw, "State"),
            activity: text(raw, "Activity"),
            node_type: text(raw, "NodeType"),
            load_avg: text(raw, "LoadAvg"),
            remote_group: text(raw, "RemoteGroup"),
            ec2_instance_id: text(raw, "EC2InstanceID"),
            ec2_public_dns: text(raw, "EC2PublicDNS"),
            ec2_ami_id: text(raw, "EC2AMIID"),
        })
    }

    /// `machine:slot`; names without a machine part are shown as is.
    pub fn machine_name(&self) -> String {
        match self.name.split_once('@') {
            Some((slot, machine)) => format!("{}:{}", machine, slot),
            None => self.name.clone(),
        }
    }
}

/// Slots in advertised order. Ads without a name are skipped.
pub fn slots(snapshot: &Snapshot) -> Vec<Slot> {
    snapshot
        .records()
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| match Slot::from_ad(raw) {
            Ok(slot) => Some(slot),
            Err(e) => {
                warn!(index, error = %e, "skipping startd ad");
                None
            }
        })
        .collect()
}
