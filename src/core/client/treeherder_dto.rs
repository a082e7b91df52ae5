//! Wire types of the Treeherder performance API.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};

use crate::domain::perf::model::{DataPoint, Meta};

fn default_lower_is_better() -> bool {
    true
}

/// `/api/project/{repo}/performance/signatures/` maps signature hash to this.
#[derive(Debug, Clone, Deserialize)]
pub struct SignatureDto {
    pub id: u64,
    pub framework_id: u32,
    #[serde(default)]
    pub signature_hash: Option<String>,
    pub machine_platform: String,
    pub suite: String,
    #[serde(default)]
    pub test: Option<String>,
    #[serde(default = "default_lower_is_better")]
    pub lower_is_better: bool,
    #[serde(default)]
    pub option_collection_hash: Option<String>,
    #[serde(default)]
    pub extra_options: Vec<String>,
}

pub type SignatureMapDto = HashMap<String, SignatureDto>;

impl SignatureDto {
    /// True for the suite-level summary signature (no test, or test named after the suite).
    pub fn is_summary(&self) -> bool {
        match self.test.as_deref() {
            None | Some("") => true,
            Some(test) => test == self.suite,
        }
    }

    pub fn to_meta(&self, repo: &str, hash: &str) -> Meta {
        Meta {
            repo: repo.to_string(),
            id: self.id,
            framework: self.framework_id,
            lower_is_better: self.lower_is_better,
            signature_hash: Some(self.signature_hash.clone().unwrap_or_else(|| hash.to_string())),
            platform: Some(self.machine_platform.clone()),
            suite: Some(self.suite.clone()),
            test: self.test.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionDto {
    pub name: String,
}

/// One entry of `/api/optioncollectionhash/`.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionCollectionDto {
    pub option_collection_hash: String,
    pub options: Vec<OptionDto>,
}

/// Treeherder has served push times both as unix seconds and as ISO strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushTimestamp(pub i64);

impl<'de> Deserialize<'de> for PushTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Seconds(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Seconds(s) => Ok(PushTimestamp(s)),
            Raw::Text(text) => parse_push_time(&text)
                .map(PushTimestamp)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid push_timestamp {:?}", text))),
        }
    }
}

fn parse_push_time(text: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc().timestamp())
}

#[derive(Debug, Clone, Deserialize)]
pub struct PerfDatumDto {
    pub push_timestamp: PushTimestamp,
    pub value: f64,
}

impl From<&PerfDatumDto> for DataPoint {
    fn from(d: &PerfDatumDto) -> Self {
        DataPoint::new(d.push_timestamp.0, d.value)
    }
}

/// `/api/project/{repo}/performance/data/` groups points by signature hash.
pub type PerfDataMapDto = HashMap<String, Vec<PerfDatumDto>>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn push_timestamp_accepts_both_encodings() {
        let data: Vec<PerfDatumDto> = serde_json::from_value(json!([
            { "push_timestamp": 1_560_000_000, "value": 1.0 },
            { "push_timestamp": "2019-06-08T13:20:00", "value": 2.0 },
            { "push_timestamp": "2019-06-08T13:20:00.250", "value": 3.0 },
        ]))
        .unwrap();

        assert_eq!(data[0].push_timestamp, PushTimestamp(1_560_000_000));
        assert_eq!(data[1].push_timestamp, PushTimestamp(1_560_000_000));
        assert_eq!(data[2].push_timestamp, PushTimestamp(1_560_000_000));
    }

    #[test]
    fn unused_upstream_fields_are_ignored() {
        let datum: PerfDatumDto = serde_json::from_value(json!({
            "push_timestamp": 1_560_000_000,
            "value": 4.5,
            "signature_id": 7,
            "push_id": 99,
            "job_id": 1234
        }))
        .unwrap();
        assert_eq!(DataPoint::from(&datum), DataPoint::new(1_560_000_000, 4.5));

        let sig: SignatureDto = serde_json::from_value(json!({
            "id": 42,
            "framework_id": 10,
            "machine_platform": "linux64",
            "suite": "speedometer",
            "parent_signature": "deadbeef"
        }))
        .unwrap();
        assert_eq!(sig.id, 42);
    }

    #[test]
    fn garbage_push_timestamp_is_an_error() {
        let res: Result<PerfDatumDto, _> =
            serde_json::from_value(json!({ "push_timestamp": "yesterday", "value": 1.0 }));
        assert!(res.is_err());
    }

    #[test]
    fn signature_defaults() {
        let sig: SignatureDto = serde_json::from_value(json!({
            "id": 42,
            "framework_id": 10,
            "machine_platform": "linux64",
            "suite": "speedometer"
        }))
        .unwrap();

        assert!(sig.lower_is_better);
        assert!(sig.is_summary());
        let meta = sig.to_meta("autoland", "abc");
        assert_eq!(meta.signature_hash.as_deref(), Some("abc"));
        assert_eq!(meta.repo, "autoland");
    }
}
