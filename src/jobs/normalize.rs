//! Projection of raw ClassAd-style attribute maps into [`JobRecord`]s.
//!
//! Attribute names are matched case-insensitively, as HTCondor does. A value
//! of `null` or the literal string `undefined` counts as absent. Records that
//! fail normalization are dropped by [`Normalizer::normalize_all`] and reported
//! through [`Diagnostics`]; they never abort the run. Only the required
//! attributes can fail a record: the identifying and display attributes fall
//! back to `None` when malformed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::diagnostics::Diagnostics;
use crate::jobs::{JobDetails, JobRecord, JobStatus};
use crate::snapshot::RawRecord;

/// Default grouping attribute set by AutoPyFactory on every pilot it submits.
pub const DEFAULT_QUEUE_KEY: &str = "MATCH_APF_QUEUE";

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizeError {
    #[error("missing required attribute '{field}'")]
    MissingField { field: String },

    #[error("attribute '{field}' has malformed value {value}")]
    MalformedValue { field: String, value: String },
}

/// Names of the snapshot attributes the normalizer reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeNames {
    /// Grouping attribute (`--key` on the CLI).
    pub queue_key: String,
    pub job_status: String,
    pub entered_current_status: String,
    /// Snapshot reference time stamped by the schedd on every ad.
    pub as_of: String,
    pub cluster_id: String,
    pub proc_id: String,
    pub queue_date: String,
    pub owner: String,
    pub cmd: String,
    pub ec2_ami_id: String,
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            queue_key: DEFAULT_QUEUE_KEY.to_string(),
            job_status: "JobStatus".to_string(),
            entered_current_status: "EnteredCurrentStatus".to_string(),
            as_of: "ServerTime".to_string(),
            cluster_id: "ClusterId".to_string(),
            proc_id: "ProcId".to_string(),
            queue_date: "QDate".to_string(),
            owner: "Owner".to_string(),
            cmd: "Cmd".to_string(),
            ec2_ami_id: "EC2AmiID".to_string(),
        }
    }
}

impl AttributeNames {
    /// Attributes without which a record cannot be classified.
    pub fn required(&self) -> [&str; 4] {
        [
            self.job_status.as_str(),
            self.queue_key.as_str(),
            self.entered_current_status.as_str(),
            self.as_of.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    names: AttributeNames,
}

impl Normalizer {
    pub fn new(names: AttributeNames) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &AttributeNames {
        &self.names
    }

    /// Validate and copy the recognized fields of one raw record.
    pub fn normalize(&self, raw: &RawRecord) -> Result<JobRecord, NormalizeError> {
        let (queue_key, status) = self.queue_and_status(raw)?;
        let entered_current_status = timestamp(raw, &self.names.entered_current_status)?;
        let as_of = timestamp(raw, &self.names.as_of)?;

        Ok(JobRecord {
            status,
            queue_key,
            entered_current_status,
            as_of,
            cluster_id: optional_int(raw, &self.names.cluster_id),
            proc_id: optional_int(raw, &self.names.proc_id),
            queue_date: optional_int(raw, &self.names.queue_date),
        })
    }

    /// Display-only attributes shown by the job listing.
    pub fn details(&self, raw: &RawRecord) -> JobDetails {
        JobDetails {
            owner: text(raw, &self.names.owner),
            cmd: text(raw, &self.names.cmd),
            ec2_ami_id: text(raw, &self.names.ec2_ami_id),
        }
    }

    /// Project only the queue key and job status. Used by the per-queue state
    /// summary, which has no need for timestamps.
    pub fn queue_and_status(&self, raw: &RawRecord) -> Result<(String, JobStatus), NormalizeError> {
        let code = required_int(raw, &self.names.job_status)?;
        let status = JobStatus::try_from(code).map_err(|_| NormalizeError::MalformedValue {
            field: self.names.job_status.clone(),
            value: code.to_string(),
        })?;
        let queue_key = queue_key(raw, &self.names.queue_key)?;
        Ok((queue_key, status))
    }

    /// Normalize a whole snapshot, dropping (and recording) every bad record.
    pub fn normalize_all(&self, raw: &[RawRecord], diagnostics: &mut Diagnostics) -> Vec<JobRecord> {
        let mut records = Vec::with_capacity(raw.len());
        for (index, r) in raw.iter().enumerate() {
            match self.normalize(r) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(index, error = %e, "dropping job record");
                    diagnostics.record_dropped(index, e);
                }
            }
        }
        debug!(kept = records.len(), total = raw.len(), "normalized snapshot");
        records
    }
}

/// Case-insensitive attribute lookup; absent, `null` and `undefined` all map to `None`.
fn lookup<'a>(raw: &'a RawRecord, name: &str) -> Option<&'a Value> {
    let value = raw.get(name).or_else(|| {
        raw.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })?;
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().eq_ignore_ascii_case("undefined") => None,
        v => Some(v),
    }
}

fn malformed(field: &str, value: &Value) -> NormalizeError {
    NormalizeError::MalformedValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn missing(field: &str) -> NormalizeError {
    NormalizeError::MissingField {
        field: field.to_string(),
    }
}

/// Integers arrive as JSON numbers or as strings; floats are truncated.
fn parse_int(field: &str, value: &Value) -> Result<i64, NormalizeError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| malformed(field, value))
}

fn required_int(raw: &RawRecord, field: &str) -> Result<i64, NormalizeError> {
    let value = lookup(raw, field).ok_or_else(|| missing(field))?;
    parse_int(field, value)
}

fn optional_int(raw: &RawRecord, field: &str) -> Option<i64> {
    match parse_int(field, lookup(raw, field)?) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(error = %e, "ignoring optional attribute");
            None
        }
    }
}

/// Scalar attribute rendered as text; structured values are ignored.
pub(crate) fn text(raw: &RawRecord, field: &str) -> Option<String> {
    match lookup(raw, field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn timestamp(raw: &RawRecord, field: &str) -> Result<i64, NormalizeError> {
    let ts = required_int(raw, field)?;
    if ts < 0 {
        return Err(NormalizeError::MalformedValue {
            field: field.to_string(),
            value: ts.to_string(),
        });
    }
    Ok(ts)
}

fn queue_key(raw: &RawRecord, field: &str) -> Result<String, NormalizeError> {
    match lookup(raw, field).ok_or_else(|| missing(field))? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(malformed(field, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    fn running_ad() -> RawRecord {
        raw(json!({
            "JobStatus": 2,
            "MATCH_APF_QUEUE": "ANALY_BNL_SHORT-gridgk07.racf.bnl.gov",
            "EnteredCurrentStatus": 1544627388,
            "ServerTime": 1544627506,
            "ClusterId": 398446,
            "ProcId": 0,
            "QDate": 1544627300,
            "MyType": "Job",
            "TargetType": "Machine"
        }))
    }

    #[test]
    fn test_normalize_complete_record() {
        let record = Normalizer::default().normalize(&running_ad()).unwrap();
        assert_eq!(record.status, JobStatus::Running);
        assert_eq!(record.queue_key, "ANALY_BNL_SHORT-gridgk07.racf.bnl.gov");
        assert_eq!(record.entered_current_status, 1544627388);
        assert_eq!(record.as_of, 1544627506);
        assert_eq!(record.cluster_id, Some(398446));
        assert_eq!(record.proc_id, Some(0));
        assert_eq!(record.queue_date, Some(1544627300));
    }

    #[test]
    fn test_attribute_names_are_case_insensitive() {
        let ad = raw(json!({
            "jobstatus": "1",
            "match_apf_queue": "q1",
            "enteredcurrentstatus": "100",
            "servertime": "160"
        }));
        let record = Normalizer::default().normalize(&ad).unwrap();
        assert_eq!(record.status, JobStatus::Idle);
        assert_eq!(record.queue_key, "q1");
        assert_eq!(record.cluster_id, None);
    }

    #[test]
    fn test_missing_required_field() {
        let mut ad = running_ad();
        ad.remove("ServerTime");
        let err = Normalizer::default().normalize(&ad).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::MissingField {
                field: "ServerTime".to_string()
            }
        );
    }

    #[test]
    fn test_undefined_and_null_count_as_missing() {
        let mut ad = running_ad();
        ad.insert("MATCH_APF_QUEUE".to_string(), json!("undefined"));
        assert!(matches!(
            Normalizer::default().normalize(&ad),
            Err(NormalizeError::MissingField { .. })
        ));

        let mut ad = running_ad();
        ad.insert("EnteredCurrentStatus".to_string(), Value::Null);
        assert!(matches!(
            Normalizer::default().normalize(&ad),
            Err(NormalizeError::MissingField { .. })
        ));
    }

    #[test]
    fn test_malformed_values() {
        let mut ad = running_ad();
        ad.insert("EnteredCurrentStatus".to_string(), json!("yesterday"));
        assert!(matches!(
            Normalizer::default().normalize(&ad),
            Err(NormalizeError::MalformedValue { ref field, .. }) if field == "EnteredCurrentStatus"
        ));

        let mut ad = running_ad();
        ad.insert("JobStatus".to_string(), json!(9));
        assert!(matches!(
            Normalizer::default().normalize(&ad),
            Err(NormalizeError::MalformedValue { ref field, .. }) if field == "JobStatus"
        ));

        let mut ad = running_ad();
        ad.insert("ServerTime".to_string(), json!(-5));
        assert!(matches!(
            Normalizer::default().normalize(&ad),
            Err(NormalizeError::MalformedValue { .. })
        ));
    }

    #[test]
    fn test_malformed_optional_attributes_become_none() {
        let mut ad = running_ad();
        ad.insert("ProcId".to_string(), json!([1]));
        ad.insert("QDate".to_string(), json!("garbage"));
        ad.insert("ClusterId".to_string(), json!({"x": 1}));

        let record = Normalizer::default().normalize(&ad).unwrap();
        assert_eq!(record.status, JobStatus::Running);
        assert_eq!(record.cluster_id, None);
        assert_eq!(record.proc_id, None);
        assert_eq!(record.queue_date, None);
    }

    #[test]
    fn test_details() {
        let mut ad = running_ad();
        ad.insert("Owner".to_string(), json!("usatlas1"));
        ad.insert("cmd".to_string(), json!("/usr/libexec/runpilot3-wrapper.sh"));
        ad.insert("EC2AmiID".to_string(), json!("undefined"));

        let details = Normalizer::default().details(&ad);
        assert_eq!(details.owner.as_deref(), Some("usatlas1"));
        assert_eq!(details.cmd.as_deref(), Some("/usr/libexec/runpilot3-wrapper.sh"));
        assert_eq!(details.ec2_ami_id, None);
    }

    #[test]
    fn test_float_timestamps_are_truncated() {
        let mut ad = running_ad();
        ad.insert("ServerTime".to_string(), json!(1544627506.9));
        let record = Normalizer::default().normalize(&ad).unwrap();
        assert_eq!(record.as_of, 1544627506);
    }

    #[test]
    fn test_custom_queue_key() {
        let names = AttributeNames {
            queue_key: "GlideinEntryName".to_string(),
            ..AttributeNames::default()
        };
        let mut ad = running_ad();
        ad.insert("GlideinEntryName".to_string(), json!("CMS_T2_US_UCSD"));
        let record = Normalizer::new(names).normalize(&ad).unwrap();
        assert_eq!(record.queue_key, "CMS_T2_US_UCSD");
    }

    #[test]
    fn test_normalize_all_drops_bad_records() {
        let mut bad = running_ad();
        bad.remove("JobStatus");
        let snapshot = vec![running_ad(), bad, running_ad()];

        let mut diagnostics = Diagnostics::default();
        let records = Normalizer::default().normalize_all(&snapshot, &mut diagnostics);

        assert_eq!(records.len(), 2);
        assert_eq!(diagnostics.dropped_records.len(), 1);
        assert_eq!(diagnostics.dropped_records[0].index, 1);
    }
}
