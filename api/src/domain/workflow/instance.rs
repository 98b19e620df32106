use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::documents::status::DocumentStatus;

/// Read-only projection of a document's workflow as reported by the EDMS API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowInstance {
    #[serde(default, alias = "current_state")]
    pub state: Option<String>,
    #[serde(default)]
    pub state_display: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl WorkflowInstance {
    pub fn status(&self) -> Option<DocumentStatus> {
        self.state
            .as_deref()
            .map(DocumentStatus::parse)
            .filter(DocumentStatus::is_known)
    }
}
