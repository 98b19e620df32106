use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::documents::document::Document;
use crate::domain::documents::status::DocumentStatus;
use crate::domain::users::user::{PermissionLevel, User, UserId};
use crate::domain::workflow::instance::WorkflowInstance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKey {
    UploadFile,
    SubmitForReview,
    TerminateDocument,
    ViewReviewStatus,
    OpenReviewerInterface,
    RouteForApproval,
    ViewApprovalStatus,
    OpenApproverInterface,
    ViewPendingEffective,
    CreateNewVersion,
    CompletePeriodicReview,
    MarkObsolete,
}

impl ActionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKey::UploadFile => "upload_file",
            ActionKey::SubmitForReview => "submit_for_review",
            ActionKey::TerminateDocument => "terminate_document",
            ActionKey::ViewReviewStatus => "view_review_status",
            ActionKey::OpenReviewerInterface => "open_reviewer_interface",
            ActionKey::RouteForApproval => "route_for_approval",
            ActionKey::ViewApprovalStatus => "view_approval_status",
            ActionKey::OpenApproverInterface => "open_approver_interface",
            ActionKey::ViewPendingEffective => "view_pending_effective",
            ActionKey::CreateNewVersion => "create_new_version",
            ActionKey::CompletePeriodicReview => "complete_periodic_review",
            ActionKey::MarkObsolete => "mark_obsolete",
        }
    }

    /// Actions that act on someone else's work; never offered to the author.
    pub fn is_review_or_approval(&self) -> bool {
        matches!(
            self,
            ActionKey::OpenReviewerInterface | ActionKey::OpenApproverInterface
        )
    }
}

impl std::fmt::Display for ActionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionColor {
    Blue,
    Green,
    Orange,
    Purple,
    Red,
    Gray,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowAction {
    pub key: ActionKey,
    pub label: &'static str,
    pub color: ActionColor,
    pub description: &'static str,
}

impl WorkflowAction {
    fn new(
        key: ActionKey,
        label: &'static str,
        color: ActionColor,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            label,
            color,
            description,
        }
    }
}

/// How the current user relates to a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleFlags {
    pub is_document_author: bool,
    pub is_assigned_reviewer: bool,
    pub is_assigned_approver: bool,
    pub has_write_permission: bool,
    pub has_approval_permission: bool,
}

impl RoleFlags {
    pub fn derive(document: &Document, user: &User) -> Self {
        let is_document_author =
            is_assigned(document.author, document.author_display.as_deref(), user);
        let is_assigned_reviewer =
            is_assigned(document.reviewer, document.reviewer_display.as_deref(), user);
        let is_assigned_approver =
            is_assigned(document.approver, document.approver_display.as_deref(), user);
        let has_write_permission = user.has_permission_level(&PermissionLevel::Write)
            || user.is_staff
            || is_document_author;
        let has_approval_permission = user.has_permission_level(&PermissionLevel::Approve)
            || user.is_staff
            || is_assigned_approver;
        Self {
            is_document_author,
            is_assigned_reviewer,
            is_assigned_approver,
            has_write_permission,
            has_approval_permission,
        }
    }
}

/// Booleans the UI uses to show or hide edit, terminate and obsolete affordances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentGates {
    pub can_edit: bool,
    pub can_terminate: bool,
    pub can_mark_obsolete: bool,
}

impl DocumentGates {
    /// Uses the same status as `resolve_actions`, so gates and actions agree.
    pub fn derive(document: &Document, user: &User, workflow: Option<&WorkflowInstance>) -> Self {
        let flags = RoleFlags::derive(document, user);
        let status = workflow
            .map(|wf| effective_status(document, wf))
            .unwrap_or_else(|| document.status.clone());
        let is_draft = status == DocumentStatus::Draft;
        let is_effective = status == DocumentStatus::Effective;
        Self {
            can_edit: is_draft && (flags.is_document_author || flags.has_write_permission),
            can_terminate: is_draft && flags.is_document_author,
            can_mark_obsolete: is_effective && can_obsolete(&flags, user),
        }
    }
}

// The display-name match is only consulted when the server sent no numeric id.
fn is_assigned(id: Option<UserId>, display: Option<&str>, user: &User) -> bool {
    match id {
        Some(id) => id == user.id,
        None => display_mentions(display, &user.username),
    }
}

fn display_mentions(display: Option<&str>, username: &str) -> bool {
    let username = username.trim();
    if username.is_empty() {
        return false;
    }
    display
        .map(|d| d.to_lowercase().contains(&username.to_lowercase()))
        .unwrap_or(false)
}

fn can_obsolete(flags: &RoleFlags, user: &User) -> bool {
    flags.is_assigned_approver || user.is_staff || user.is_superuser
}

fn effective_status(document: &Document, workflow: &WorkflowInstance) -> DocumentStatus {
    if document.status.is_known() {
        return document.status.clone();
    }
    workflow
        .status()
        .unwrap_or_else(|| document.status.clone())
}

/// Actions the user may take on the document right now, in display order.
///
/// Returns an empty list when any input is missing. The author of a
/// document is never offered the reviewer or approver interface.
pub fn resolve_actions(
    document: Option<&Document>,
    user: Option<&User>,
    workflow: Option<&WorkflowInstance>,
    now: DateTime<Utc>,
) -> Vec<WorkflowAction> {
    let (Some(document), Some(user), Some(workflow)) = (document, user, workflow) else {
        return Vec::new();
    };
    let flags = RoleFlags::derive(document, user);
    let status = effective_status(document, workflow);

    let mut actions = actions_for_status(&status, document, user, &flags, now);
    if flags.is_document_author {
        actions.retain(|a| !a.key.is_review_or_approval());
    }
    actions
}

fn actions_for_status(
    status: &DocumentStatus,
    document: &Document,
    user: &User,
    flags: &RoleFlags,
    now: DateTime<Utc>,
) -> Vec<WorkflowAction> {
    use ActionColor::*;
    use ActionKey::*;

    let mut actions = Vec::new();
    match status {
        DocumentStatus::Draft => {
            if flags.is_document_author {
                if document.has_file() {
                    actions.push(WorkflowAction::new(
                        SubmitForReview,
                        "Submit for Review",
                        Blue,
                        "Route this draft to the assigned reviewer",
                    ));
                } else {
                    actions.push(WorkflowAction::new(
                        UploadFile,
                        "Upload File",
                        Orange,
                        "Attach the document file before submitting for review",
                    ));
                }
                actions.push(WorkflowAction::new(
                    TerminateDocument,
                    "Terminate Document",
                    Red,
                    "Permanently stop this draft; cannot be undone",
                ));
            }
        }
        DocumentStatus::PendingReview | DocumentStatus::UnderReview => {
            if flags.is_document_author {
                actions.push(WorkflowAction::new(
                    ViewReviewStatus,
                    "View Review Status",
                    Gray,
                    "Track the progress of the review",
                ));
            } else if flags.is_assigned_reviewer {
                let (label, description) = if *status == DocumentStatus::PendingReview {
                    ("Start Review", "Open the reviewer interface for this document")
                } else {
                    ("Continue Review", "Resume the review in progress")
                };
                actions.push(WorkflowAction::new(
                    OpenReviewerInterface,
                    label,
                    Purple,
                    description,
                ));
            }
        }
        DocumentStatus::ReviewCompleted | DocumentStatus::Reviewed => {
            if flags.is_document_author {
                actions.push(WorkflowAction::new(
                    RouteForApproval,
                    "Route for Approval",
                    Blue,
                    "Send the reviewed document to the approver",
                ));
            }
        }
        DocumentStatus::PendingApproval | DocumentStatus::UnderApproval => {
            if flags.is_document_author {
                actions.push(WorkflowAction::new(
                    ViewApprovalStatus,
                    "View Approval Status",
                    Gray,
                    "Track the progress of the approval",
                ));
            } else if flags.is_assigned_approver {
                actions.push(WorkflowAction::new(
                    OpenApproverInterface,
                    "Review for Approval",
                    Green,
                    "Open the approver interface for this document",
                ));
            }
        }
        DocumentStatus::ApprovedPendingEffective => {
            if flags.is_assigned_approver || flags.has_write_permission {
                actions.push(WorkflowAction::new(
                    ViewPendingEffective,
                    "Pending Effective Date",
                    Gray,
                    "Approved; becomes effective automatically on its effective date",
                ));
            }
        }
        DocumentStatus::Effective => {
            actions.push(WorkflowAction::new(
                CreateNewVersion,
                "Create New Version",
                Blue,
                "Start a new draft version of this document",
            ));
            let review_due = document
                .next_review_date
                .map(|due| due <= now.date_naive())
                .unwrap_or(false);
            if review_due {
                actions.push(WorkflowAction::new(
                    CompletePeriodicReview,
                    "Complete Periodic Review",
                    Orange,
                    "Record the outcome of the scheduled periodic review",
                ));
            }
            if can_obsolete(flags, user) {
                actions.push(WorkflowAction::new(
                    MarkObsolete,
                    "Mark Obsolete",
                    Red,
                    "Retire this document from use",
                ));
            }
        }
        DocumentStatus::Superseded
        | DocumentStatus::Obsolete
        | DocumentStatus::Terminated
        | DocumentStatus::Unknown(_) => {}
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn user(id: i64, roles: &[&str]) -> User {
        serde_json::from_value(json!({"id": id, "username": format!("user{id}"), "roles": roles}))
            .unwrap()
    }

    fn document(status: &str, author: i64, reviewer: i64, approver: i64) -> Document {
        serde_json::from_value(json!({
            "id": 10,
            "uuid": "0d4f6fa3-0a6b-4ab7-9d8e-6f0b1e2b3c4d",
            "document_number": "SOP-002-v1.0",
            "title": "Line clearance",
            "status": status,
            "author": author,
            "reviewer": reviewer,
            "approver": approver,
            "file_path": "sop-002.docx"
        }))
        .unwrap()
    }

    fn keys(actions: &[WorkflowAction]) -> Vec<ActionKey> {
        actions.iter().map(|a| a.key).collect()
    }

    fn workflow() -> WorkflowInstance {
        WorkflowInstance::default()
    }

    #[test]
    fn missing_inputs_yield_no_actions() {
        let doc = document("DRAFT", 1, 2, 3);
        let u = user(1, &["write"]);
        let wf = workflow();
        assert!(resolve_actions(None, Some(&u), Some(&wf), now()).is_empty());
        assert!(resolve_actions(Some(&doc), None, Some(&wf), now()).is_empty());
        assert!(resolve_actions(Some(&doc), Some(&u), None, now()).is_empty());
    }

    #[test]
    fn draft_without_file_offers_upload_and_terminate() {
        let mut doc = document("DRAFT", 1, 2, 3);
        doc.file_path = None;
        let u = user(1, &[]);
        let actions = resolve_actions(Some(&doc), Some(&u), Some(&workflow()), now());
        assert_eq!(
            keys(&actions),
            vec![ActionKey::UploadFile, ActionKey::TerminateDocument]
        );
    }

    #[test]
    fn draft_with_file_offers_submit() {
        let doc = document("draft", 1, 2, 3);
        let u = user(1, &[]);
        let actions = resolve_actions(Some(&doc), Some(&u), Some(&workflow()), now());
        assert_eq!(
            keys(&actions),
            vec![ActionKey::SubmitForReview, ActionKey::TerminateDocument]
        );
        let other = user(9, &["write", "approve"]);
        assert!(resolve_actions(Some(&doc), Some(&other), Some(&workflow()), now()).is_empty());
    }

    #[test]
    fn author_never_gets_review_or_approval_interfaces() {
        let statuses = [
            "DRAFT",
            "PENDING_REVIEW",
            "UNDER_REVIEW",
            "REVIEW_COMPLETED",
            "REVIEWED",
            "PENDING_APPROVAL",
            "UNDER_APPROVAL",
            "APPROVED_PENDING_EFFECTIVE",
            "EFFECTIVE",
        ];
        let mut author = user(1, &["write", "review", "approve", "admin"]);
        author.is_staff = true;
        author.is_superuser = true;
        for status in statuses {
            // author assigned to every role on their own document
            let doc = document(status, 1, 1, 1);
            let actions = resolve_actions(Some(&doc), Some(&author), Some(&workflow()), now());
            assert!(
                actions.iter().all(|a| !a.key.is_review_or_approval()),
                "status {status} leaked {:?}",
                keys(&actions)
            );
        }
    }

    #[test]
    fn reviewer_sees_start_then_continue() {
        let reviewer = user(2, &["review"]);
        let pending = document("PENDING_REVIEW", 1, 2, 3);
        let actions = resolve_actions(Some(&pending), Some(&reviewer), Some(&workflow()), now());
        assert_eq!(keys(&actions), vec![ActionKey::OpenReviewerInterface]);
        assert_eq!(actions[0].label, "Start Review");

        let under = document("UNDER_REVIEW", 1, 2, 3);
        let actions = resolve_actions(Some(&under), Some(&reviewer), Some(&workflow()), now());
        assert_eq!(actions[0].label, "Continue Review");

        let author = user(1, &[]);
        let actions = resolve_actions(Some(&pending), Some(&author), Some(&workflow()), now());
        assert_eq!(keys(&actions), vec![ActionKey::ViewReviewStatus]);
    }

    #[test]
    fn approver_interface_only_for_assigned_approver() {
        let approver = user(3, &["approve"]);
        let doc = document("PENDING_APPROVAL", 1, 2, 3);
        let actions = resolve_actions(Some(&doc), Some(&approver), Some(&workflow()), now());
        assert_eq!(keys(&actions), vec![ActionKey::OpenApproverInterface]);

        let reassigned = document("PENDING_APPROVAL", 1, 2, 42);
        let actions = resolve_actions(Some(&reassigned), Some(&approver), Some(&workflow()), now());
        assert!(
            actions
                .iter()
                .all(|a| a.key != ActionKey::OpenApproverInterface)
        );
    }

    #[test]
    fn reviewed_document_is_routed_by_author() {
        let doc = document("REVIEW_COMPLETED", 1, 2, 3);
        let actions = resolve_actions(Some(&doc), Some(&user(1, &[])), Some(&workflow()), now());
        assert_eq!(keys(&actions), vec![ActionKey::RouteForApproval]);
        let actions = resolve_actions(Some(&doc), Some(&user(2, &[])), Some(&workflow()), now());
        assert!(actions.is_empty());
    }

    #[test]
    fn pending_effective_is_informational() {
        let doc = document("APPROVED_PENDING_EFFECTIVE", 1, 2, 3);
        let approver = user(3, &[]);
        let actions = resolve_actions(Some(&doc), Some(&approver), Some(&workflow()), now());
        assert_eq!(keys(&actions), vec![ActionKey::ViewPendingEffective]);
        let reader = user(8, &["read"]);
        assert!(resolve_actions(Some(&doc), Some(&reader), Some(&workflow()), now()).is_empty());
    }

    #[test]
    fn effective_document_actions_depend_on_review_date_and_role() {
        let mut doc = document("EFFECTIVE", 1, 2, 3);
        let reader = user(8, &["read"]);
        let actions = resolve_actions(Some(&doc), Some(&reader), Some(&workflow()), now());
        assert_eq!(keys(&actions), vec![ActionKey::CreateNewVersion]);

        doc.next_review_date = Some(now().date_naive());
        let actions = resolve_actions(Some(&doc), Some(&reader), Some(&workflow()), now());
        assert_eq!(
            keys(&actions),
            vec![ActionKey::CreateNewVersion, ActionKey::CompletePeriodicReview]
        );

        let mut staff = user(9, &[]);
        staff.is_staff = true;
        let actions = resolve_actions(Some(&doc), Some(&staff), Some(&workflow()), now());
        assert_eq!(actions.last().map(|a| a.key), Some(ActionKey::MarkObsolete));

        let approver = user(3, &[]);
        assert!(DocumentGates::derive(&doc, &approver, None).can_mark_obsolete);
        assert!(!DocumentGates::derive(&doc, &reader, None).can_mark_obsolete);
    }

    #[test]
    fn display_fallback_only_without_numeric_id() {
        let mut doc = document("PENDING_REVIEW", 1, 2, 3);
        doc.reviewer = None;
        doc.reviewer_display = Some("Jane Roe (JROE)".into());
        let mut jroe = user(77, &[]);
        jroe.username = "jroe".into();
        let flags = RoleFlags::derive(&doc, &jroe);
        assert!(flags.is_assigned_reviewer);

        doc.reviewer = Some(UserId(2));
        let flags = RoleFlags::derive(&doc, &jroe);
        assert!(!flags.is_assigned_reviewer);
    }

    #[test]
    fn unknown_document_status_falls_back_to_workflow_state() {
        let doc = document("IN_FLIGHT", 1, 2, 3);
        let wf = WorkflowInstance {
            state: Some("pending_approval".into()),
            ..WorkflowInstance::default()
        };
        let actions = resolve_actions(Some(&doc), Some(&user(3, &[])), Some(&wf), now());
        assert_eq!(keys(&actions), vec![ActionKey::OpenApproverInterface]);
    }

    #[test]
    fn gates_follow_status_and_role() {
        let doc = document("DRAFT", 1, 2, 3);
        let author = DocumentGates::derive(&doc, &user(1, &[]), None);
        assert!(author.can_edit && author.can_terminate && !author.can_mark_obsolete);
        let writer = DocumentGates::derive(&doc, &user(5, &["write"]), Some(&workflow()));
        assert!(writer.can_edit && !writer.can_terminate);
        let reader = DocumentGates::derive(&doc, &user(6, &["read"]), None);
        assert_eq!(reader, DocumentGates::default());
    }

    #[test]
    fn gates_agree_with_actions_when_status_comes_from_workflow() {
        let doc = document("IN_FLIGHT", 1, 2, 3);
        let draft = WorkflowInstance {
            state: Some("draft".into()),
            ..WorkflowInstance::default()
        };
        let author = user(1, &[]);
        let actions = resolve_actions(Some(&doc), Some(&author), Some(&draft), now());
        assert!(keys(&actions).contains(&ActionKey::SubmitForReview));
        let gates = DocumentGates::derive(&doc, &author, Some(&draft));
        assert!(gates.can_edit && gates.can_terminate);

        let effective = WorkflowInstance {
            state: Some("effective".into()),
            ..WorkflowInstance::default()
        };
        let approver = user(3, &[]);
        let actions = resolve_actions(Some(&doc), Some(&approver), Some(&effective), now());
        assert!(keys(&actions).contains(&ActionKey::MarkObsolete));
        assert!(DocumentGates::derive(&doc, &approver, Some(&effective)).can_mark_obsolete);
        assert!(!DocumentGates::derive(&doc, &approver, None).can_mark_obsolete);
    }
}
