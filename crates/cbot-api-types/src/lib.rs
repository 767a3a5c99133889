//! Wire types for the cloud bot execution API.
//!
//! Every response body is a JSON object carrying an integer `code`; success
//! payloads add operation-specific fields on top of it.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level part shared by every response body.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Envelope {
    /// Application status code. A missing field decodes as `0`.
    #[serde(default)]
    pub code: i64,
}

/// Bot metadata as returned by the bot listing endpoint.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct BotSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
}

/// Listings may carry `null` instead of an empty array.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bots: Vec<BotSummary>,
}

/// One job snapshot.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct JobSummary {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub bot_name: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub elapsed_time: Option<i64>,
}

impl JobSummary {
    /// Human label for the raw status; unknown statuses render as `???`.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        JobStatus::label_for(self.status.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub jobs: Vec<JobSummary>,
}

/// Known job states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Exit,
    Error,
    Running,
}

impl JobStatus {
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Exit),
            1 => Some(Self::Error),
            2 => Some(Self::Running),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::Error => "error",
            Self::Running => "running",
        }
    }

    #[must_use]
    pub fn label_for(code: i64) -> &'static str {
        Self::from_code(code).map_or("???", Self::as_str)
    }
}

/// Body of a bot execution request.
///
/// `timeout_time` and `callback_tries` are interpreted by the server; the
/// client never applies them to its own connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub timeout_time: u32,
    pub callback_endpoint: String,
    pub callback_tries: u32,
    pub input: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_cover_known_and_unknown_codes() {
        assert_eq!(JobStatus::label_for(0), "exit");
        assert_eq!(JobStatus::label_for(1), "error");
        assert_eq!(JobStatus::label_for(2), "running");
        assert_eq!(JobStatus::label_for(99), "???");
        assert_eq!(JobStatus::label_for(-1), "???");
    }

    #[test]
    fn envelope_defaults_missing_code_to_zero() {
        let env: Envelope = serde_json::from_str(r#"{"bots":[]}"#).expect("decode");
        assert_eq!(env.code, 0);
    }

    #[test]
    fn job_list_tolerates_null_fields() {
        let list: JobList = serde_json::from_str(
            r#"{"code":200,"jobs":[{"job_id":"j1","bot_id":null,"status":2}]}"#,
        )
        .expect("decode");
        assert_eq!(list.jobs.len(), 1);
        assert_eq!(list.jobs[0].job_id.as_deref(), Some("j1"));
        assert_eq!(list.jobs[0].bot_id, None);
        assert_eq!(list.jobs[0].status_label(), "running");
    }

    #[test]
    fn null_listings_decode_as_empty() {
        let bots: BotList = serde_json::from_str(r#"{"code":200,"bots":null}"#).expect("decode");
        assert!(bots.bots.is_empty());
        let jobs: JobList = serde_json::from_str(r#"{"code":200,"jobs":null}"#).expect("decode");
        assert!(jobs.jobs.is_empty());
        let missing: JobList = serde_json::from_str(r#"{"code":200}"#).expect("decode");
        assert!(missing.jobs.is_empty());
    }

    #[test]
    fn execution_request_serializes_wire_field_names() {
        let mut input = BTreeMap::new();
        input.insert("key".to_string(), "value".to_string());
        let req = ExecutionRequest {
            timeout_time: 30,
            callback_endpoint: "https://example.com/hook".into(),
            callback_tries: 2,
            input,
        };
        let value = serde_json::to_value(&req).expect("encode");
        assert_eq!(
            value,
            serde_json::json!({
                "timeout_time": 30,
                "callback_endpoint": "https://example.com/hook",
                "callback_tries": 2,
                "input": {"key": "value"}
            })
        );
    }
}
