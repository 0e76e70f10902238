//! Apify API payload types
//!
//! Run objects are typed. Dataset items stay raw JSON and are read field
//! by field, so they can be persisted verbatim.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope used by single-object API responses
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub message: String,
}

/// Lifecycle status of an actor run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    #[serde(rename = "READY")]
    Ready,
    #[serde(rename = "RUNNING")]
    Running,
    #[serde(rename = "SUCCEEDED")]
    Succeeded,
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "TIMING-OUT")]
    TimingOut,
    #[serde(rename = "TIMED-OUT")]
    TimedOut,
    #[serde(rename = "ABORTING")]
    Aborting,
    #[serde(rename = "ABORTED")]
    Aborted,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Whether the run can no longer change state
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::TimedOut | RunStatus::Aborted
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Ready => "READY",
            RunStatus::Running => "RUNNING",
            RunStatus::Succeeded => "SUCCEEDED",
            RunStatus::Failed => "FAILED",
            RunStatus::TimingOut => "TIMING-OUT",
            RunStatus::TimedOut => "TIMED-OUT",
            RunStatus::Aborting => "ABORTING",
            RunStatus::Aborted => "ABORTED",
            RunStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actor run object, as returned by the runs endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRun {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub default_dataset_id: Option<String>,
}

/// Outcome of a submitted run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInfo {
    pub run_id: String,
    pub dataset_id: String,
    pub status: RunStatus,
}

/// Content reference stored in the key-value store
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentRef {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub length: Option<u64>,
}

/// Page metadata reported by the extractor
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

/// Keys of the content references an item may carry
const CONTENT_FIELDS: [&str; 6] = [
    "rawHtml",
    "extractedText",
    "extractedJson",
    "extractedMarkdown",
    "extractedXml",
    "extractedXmlTei",
];

/// One record of the actor's output dataset
///
/// The record is kept exactly as returned. Accessors read single fields
/// and treat a value of the wrong shape as absent, so one odd record
/// never affects the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetItem(Value);

impl DatasetItem {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// The record as returned by the API
    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn loaded_url(&self) -> Option<&str> {
        self.0.get("loadedUrl").and_then(Value::as_str)
    }

    pub fn http_status(&self) -> Option<u64> {
        self.0.get("httpStatus").and_then(Value::as_u64)
    }

    /// Whether the actor flagged this record as failed
    ///
    /// A non-boolean `#error` counts when it is truthy.
    pub fn is_error(&self) -> bool {
        match self.0.get("#error") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(n)) => n.as_f64() != Some(0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.0.get("#errorMessage").and_then(Value::as_str)
    }

    pub fn metadata(&self) -> Option<PageMetadata> {
        self.0
            .get("metadata")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Content references present on the record, keyed by field name
    pub fn content_refs(&self) -> Vec<(&'static str, ContentRef)> {
        CONTENT_FIELDS
            .iter()
            .filter_map(|field| {
                let value = self.0.get(*field)?;
                let content = serde_json::from_value(value.clone()).ok()?;
                Some((*field, content))
            })
            .collect()
    }
}

impl From<Value> for DatasetItem {
    fn from(raw: Value) -> Self {
        Self(raw)
    }
}
