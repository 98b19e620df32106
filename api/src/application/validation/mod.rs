use std::collections::BTreeMap;

use serde::Serialize;

use crate::application::dto::documents::{
    CreateDocumentForm, CreateVersionRequest, DEFAULT_REVIEW_MONTHS, MarkObsoleteRequest,
    PeriodicReviewRequest, PeriodicReviewSubmission, ReviewOutcome, RouteForApprovalRequest,
    TerminateRequest, UpdateDocumentForm,
};

/// Text the user must type before a document is terminated.
pub const TERMINATE_CONFIRMATION: &str = "TERMINATE";

pub const REVIEW_MONTHS_RANGE: std::ops::RangeInclusive<u32> = 1..=120;

/// Field name to message. Ordered so responses are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        f.write_str(&parts.join("; "))
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn require_text(errors: &mut ValidationErrors, field: &'static str, value: &str, label: &str) {
    if is_blank(value) {
        errors.add(field, format!("{label} is required"));
    }
}

pub fn validate_create(form: &CreateDocumentForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    require_text(&mut errors, "title", &form.title, "Title");
    require_text(&mut errors, "description", &form.description, "Description");
    if form.reviewer.is_none() {
        errors.add("reviewer", "Reviewer is required");
    }
    if form.approver.is_none() {
        errors.add("approver", "Approver is required");
    }
    match &form.file {
        None => errors.add("file", "File is required"),
        Some(file) if file.bytes.is_empty() || is_blank(&file.file_name) => {
            errors.add("file", "File is empty")
        }
        Some(_) => {}
    }
    errors.into_result()
}

pub fn validate_update(form: &UpdateDocumentForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if form.is_empty() {
        errors.add("form", "Nothing to update");
    }
    if let Some(title) = &form.title {
        require_text(&mut errors, "title", title, "Title");
    }
    if let Some(description) = &form.description {
        require_text(&mut errors, "description", description, "Description");
    }
    if let Some(file) = &form.file {
        if file.bytes.is_empty() {
            errors.add("file", "File is empty");
        }
    }
    errors.into_result()
}

pub fn validate_route_for_approval(req: &RouteForApprovalRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if req.approver_id.is_none() {
        errors.add("approver_id", "Approver is required");
    }
    errors.into_result()
}

pub fn validate_create_version(req: &CreateVersionRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    require_text(&mut errors, "change_summary", &req.change_summary, "Change summary");
    errors.into_result()
}

pub fn validate_mark_obsolete(req: &MarkObsoleteRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    require_text(&mut errors, "reason", &req.reason, "Reason");
    errors.into_result()
}

pub fn validate_terminate(req: &TerminateRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    require_text(&mut errors, "reason", &req.reason, "Reason");
    if req.confirmation.trim() != TERMINATE_CONFIRMATION {
        errors.add(
            "confirmation",
            format!("Type {TERMINATE_CONFIRMATION} to confirm"),
        );
    }
    errors.into_result()
}

/// Checks a periodic review and fills in the default review interval.
pub fn validate_periodic_review(
    req: &PeriodicReviewRequest,
) -> Result<PeriodicReviewSubmission, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if req.outcome == ReviewOutcome::UpversionRequired && is_blank(&req.comments) {
        errors.add(
            "comments",
            "Comments are required when an up-version is needed",
        );
    }
    let months = req.next_review_months.unwrap_or(DEFAULT_REVIEW_MONTHS);
    if !REVIEW_MONTHS_RANGE.contains(&months) {
        errors.add(
            "next_review_months",
            format!(
                "Must be between {} and {} months",
                REVIEW_MONTHS_RANGE.start(),
                REVIEW_MONTHS_RANGE.end()
            ),
        );
    }
    errors.into_result()?;
    Ok(PeriodicReviewSubmission {
        outcome: req.outcome,
        comments: req.comments.trim().to_string(),
        next_review_months: months,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::documents::{UploadedFile, VersionBump};

    fn file() -> UploadedFile {
        UploadedFile {
            file_name: "sop.docx".into(),
            content_type: None,
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn create_requires_every_field() {
        let errors = validate_create(&CreateDocumentForm::default()).unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(
            fields,
            vec!["approver", "description", "file", "reviewer", "title"]
        );

        let form = CreateDocumentForm {
            title: "Cleaning".into(),
            description: "Line cleaning".into(),
            document_type: None,
            reviewer: Some(2),
            approver: Some(3),
            file: Some(file()),
        };
        assert!(validate_create(&form).is_ok());
    }

    #[test]
    fn update_rejects_blank_fields_and_empty_forms() {
        assert!(validate_update(&UpdateDocumentForm::default()).is_err());
        let form = UpdateDocumentForm {
            title: Some("   ".into()),
            ..UpdateDocumentForm::default()
        };
        let errors = validate_update(&form).unwrap_err();
        assert_eq!(errors.get("title"), Some("Title is required"));
    }

    #[test]
    fn terminate_needs_reason_and_exact_confirmation() {
        let req = TerminateRequest {
            reason: "Duplicate of SOP-003".into(),
            confirmation: "terminate".into(),
        };
        let errors = validate_terminate(&req).unwrap_err();
        assert!(errors.get("confirmation").is_some());
        assert!(errors.get("reason").is_none());

        let req = TerminateRequest {
            confirmation: TERMINATE_CONFIRMATION.into(),
            ..req
        };
        assert!(validate_terminate(&req).is_ok());
    }

    #[test]
    fn periodic_review_defaults_and_bounds() {
        let ok = validate_periodic_review(&PeriodicReviewRequest {
            outcome: ReviewOutcome::Confirmed,
            comments: String::new(),
            next_review_months: None,
        })
        .unwrap();
        assert_eq!(ok.next_review_months, DEFAULT_REVIEW_MONTHS);

        let errors = validate_periodic_review(&PeriodicReviewRequest {
            outcome: ReviewOutcome::UpversionRequired,
            comments: " ".into(),
            next_review_months: Some(0),
        })
        .unwrap_err();
        assert!(errors.get("comments").is_some());
        assert!(errors.get("next_review_months").is_some());
    }

    #[test]
    fn workflow_requests_need_their_text() {
        assert!(validate_route_for_approval(&RouteForApprovalRequest::default()).is_err());
        assert!(
            validate_create_version(&CreateVersionRequest {
                version_type: VersionBump::Minor,
                change_summary: "".into(),
                reason_for_change: None,
            })
            .is_err()
        );
        assert!(validate_mark_obsolete(&MarkObsoleteRequest::default()).is_err());
    }
}
