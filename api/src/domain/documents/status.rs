use serde::{Deserialize, Serialize};

/// Lifecycle state of a controlled document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentStatus {
    Draft,
    PendingReview,
    UnderReview,
    ReviewCompleted,
    Reviewed,
    PendingApproval,
    UnderApproval,
    ApprovedPendingEffective,
    Effective,
    Superseded,
    Obsolete,
    Terminated,
    Unknown(String),
}

impl DocumentStatus {
    /// Case-insensitive; spaces and hyphens count as underscores.
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        match normalized.as_str() {
            "DRAFT" => DocumentStatus::Draft,
            "PENDING_REVIEW" => DocumentStatus::PendingReview,
            "UNDER_REVIEW" => DocumentStatus::UnderReview,
            "REVIEW_COMPLETED" => DocumentStatus::ReviewCompleted,
            "REVIEWED" => DocumentStatus::Reviewed,
            "PENDING_APPROVAL" => DocumentStatus::PendingApproval,
            "UNDER_APPROVAL" => DocumentStatus::UnderApproval,
            "APPROVED_PENDING_EFFECTIVE" => DocumentStatus::ApprovedPendingEffective,
            "EFFECTIVE" => DocumentStatus::Effective,
            "SUPERSEDED" => DocumentStatus::Superseded,
            "OBSOLETE" => DocumentStatus::Obsolete,
            "TERMINATED" => DocumentStatus::Terminated,
            _ => DocumentStatus::Unknown(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DocumentStatus::Draft => "DRAFT",
            DocumentStatus::PendingReview => "PENDING_REVIEW",
            DocumentStatus::UnderReview => "UNDER_REVIEW",
            DocumentStatus::ReviewCompleted => "REVIEW_COMPLETED",
            DocumentStatus::Reviewed => "REVIEWED",
            DocumentStatus::PendingApproval => "PENDING_APPROVAL",
            DocumentStatus::UnderApproval => "UNDER_APPROVAL",
            DocumentStatus::ApprovedPendingEffective => "APPROVED_PENDING_EFFECTIVE",
            DocumentStatus::Effective => "EFFECTIVE",
            DocumentStatus::Superseded => "SUPERSEDED",
            DocumentStatus::Obsolete => "OBSOLETE",
            DocumentStatus::Terminated => "TERMINATED",
            DocumentStatus::Unknown(s) => s.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, DocumentStatus::Unknown(_))
    }
}

impl From<String> for DocumentStatus {
    fn from(value: String) -> Self {
        DocumentStatus::parse(&value)
    }
}

impl From<DocumentStatus> for String {
    fn from(value: DocumentStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(DocumentStatus::parse("draft"), DocumentStatus::Draft);
        assert_eq!(
            DocumentStatus::parse("Pending Review"),
            DocumentStatus::PendingReview
        );
        assert_eq!(
            DocumentStatus::parse("approved-pending-effective"),
            DocumentStatus::ApprovedPendingEffective
        );
    }

    #[test]
    fn unknown_keeps_normalized_text() {
        let status = DocumentStatus::parse("on hold");
        assert_eq!(status, DocumentStatus::Unknown("ON_HOLD".into()));
        assert!(!status.is_known());
        assert_eq!(String::from(status), "ON_HOLD");
    }
}
