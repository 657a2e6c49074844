//! Typed views over apps API payloads. Responses are returned as
//! [`ApiObject`](crate::ApiObject); decode with `obj.decode::<T>()`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response to an app package upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppUpload {
    pub id: u64,
}

/// Response to app create/update: a background job to poll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppJob {
    pub job_id: String,
}

/// Progress record of an app build job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobStatus {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub progress: Option<u64>,
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub app_id: Option<u64>,
    #[serde(default)]
    pub app_url: Option<String>,
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self.status.as_str(), "completed" | "failed" | "killed")
    }

    pub fn is_success(&self) -> bool {
        self.status == "completed"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Installation {
    pub id: u64,
    pub app_id: u64,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub settings: Option<Value>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstallationList {
    pub installations: Vec<Installation>,
}

/// Body of `apps/notify.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub app_id: u64,
    pub event: String,
    pub body: Value,
    /// Only this agent's app instances receive the event when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<u64>,
}
