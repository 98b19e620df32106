use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::domain::documents::dependency::DocumentDependency;
use crate::domain::documents::number::DocumentNumber;
use crate::domain::documents::status::DocumentStatus;
use crate::domain::users::user::{UserId, lenient_user_ref};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub uuid: Uuid,
    pub document_number: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: DocumentStatus,
    #[serde(default, deserialize_with = "lenient_user_ref")]
    pub author: Option<UserId>,
    #[serde(default, deserialize_with = "lenient_user_ref")]
    pub reviewer: Option<UserId>,
    #[serde(default, deserialize_with = "lenient_user_ref")]
    pub approver: Option<UserId>,
    #[serde(default)]
    pub author_display: Option<String>,
    #[serde(default)]
    pub reviewer_display: Option<String>,
    #[serde(default)]
    pub approver_display: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub effective_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub next_review_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub last_review_date: Option<NaiveDate>,
    #[serde(default)]
    pub dependencies: Vec<DocumentDependency>,
    #[serde(default)]
    pub dependents: Vec<DocumentDependency>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub version_major: Option<u32>,
    #[serde(default)]
    pub version_minor: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    pub fn has_file(&self) -> bool {
        [self.file_path.as_deref(), self.file_name.as_deref()]
            .into_iter()
            .flatten()
            .any(|s| !s.trim().is_empty())
    }

    pub fn number(&self) -> DocumentNumber {
        DocumentNumber::parse(&self.document_number)
    }

    pub fn file_extension(&self) -> Option<&str> {
        let name = self
            .file_name
            .as_deref()
            .or(self.file_path.as_deref())?
            .rsplit(['/', '\\'])
            .next()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            None
        } else {
            Some(ext)
        }
    }
}

/// Dates arrive either as `YYYY-MM-DD` or as full RFC 3339 timestamps.
/// Blank or unparseable values read as absent.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(str::trim).and_then(parse_date))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}
