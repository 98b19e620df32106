use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REVIEW_MONTHS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFilter {
    MyTasks,
    PendingMyAction,
    PeriodicReview,
}

impl DocumentFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFilter::MyTasks => "my_tasks",
            DocumentFilter::PendingMyAction => "pending_my_action",
            DocumentFilter::PeriodicReview => "periodic_review",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentQuery {
    pub status: Option<String>,
    pub filter: Option<DocumentFilter>,
    #[serde(default)]
    pub mine: bool,
    pub search: Option<String>,
}

impl DocumentQuery {
    /// Query-string pairs understood by the EDMS list endpoint.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("status", status.to_ascii_uppercase()));
        }
        if let Some(filter) = self.filter {
            pairs.push(("filter", filter.as_str().to_string()));
        }
        if self.mine {
            pairs.push(("author", "me".to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateDocumentForm {
    pub title: String,
    pub description: String,
    pub document_type: Option<String>,
    pub reviewer: Option<i64>,
    pub approver: Option<i64>,
    pub file: Option<UploadedFile>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDocumentForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub reviewer: Option<i64>,
    pub approver: Option<i64>,
    pub file: Option<UploadedFile>,
}

impl UpdateDocumentForm {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.reviewer.is_none()
            && self.approver.is_none()
            && self.file.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitForReviewRequest {
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteForApprovalRequest {
    pub approver_id: Option<i64>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
    Major,
    Minor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVersionRequest {
    pub version_type: VersionBump,
    pub change_summary: String,
    #[serde(default)]
    pub reason_for_change: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkObsoleteRequest {
    pub reason: String,
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewOutcome {
    Confirmed,
    UpversionRequired,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PeriodicReviewRequest {
    pub outcome: ReviewOutcome,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub next_review_months: Option<u32>,
}

/// Body sent to the EDMS API once a periodic review passes validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodicReviewSubmission {
    pub outcome: ReviewOutcome,
    pub comments: String,
    pub next_review_months: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TerminateRequest {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub confirmation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadVariant {
    Original,
    Annotated,
    Official,
}

impl DownloadVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadVariant::Original => "original",
            DownloadVariant::Annotated => "annotated",
            DownloadVariant::Official => "official",
        }
    }
}

/// A download as received from the EDMS API.
#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct DocumentDownload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
