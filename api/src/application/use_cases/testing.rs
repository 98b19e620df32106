//! In-memory EDMS API and event sink shared by the use-case tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::application::dto::documents::{
    CreateDocumentForm, CreateVersionRequest, DocumentQuery, DownloadVariant, FetchedFile,
    MarkObsoleteRequest, PeriodicReviewSubmission, RouteForApprovalRequest, UpdateDocumentForm,
};
use crate::application::ports::edms_client::{EdmsClient, EdmsClientError};
use crate::application::ports::ui_event_publisher::{ScopedUiEvent, UiEventPublisher};
use crate::domain::documents::dependency::DependencyChain;
use crate::domain::documents::document::Document;
use crate::domain::documents::status::DocumentStatus;
use crate::domain::users::user::User;
use crate::domain::workflow::instance::WorkflowInstance;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
}

fn user(id: i64, username: &str, roles: &[&str]) -> User {
    serde_json::from_value(json!({"id": id, "username": username, "roles": roles})).unwrap()
}

pub fn author() -> User {
    user(1, "author", &["write"])
}

pub fn reviewer() -> User {
    user(2, "reviewer", &["review"])
}

pub fn approver() -> User {
    user(3, "approver", &["approve"])
}

pub fn document_with(status: &str, file: Option<&str>) -> Document {
    serde_json::from_value(json!({
        "id": 10,
        "uuid": "3b9a3c1e-2f4d-4f5e-8a7b-1c2d3e4f5a6b",
        "document_number": "SOP-002-v1.0",
        "title": "Line clearance",
        "description": "Clearing the packaging line",
        "status": status,
        "author": 1,
        "reviewer": 2,
        "approver": 3,
        "file_name": file,
        "next_review_date": "2026-10-01"
    }))
    .unwrap()
}

pub fn draft_document() -> Document {
    document_with("DRAFT", Some("sop-002.docx"))
}

pub fn effective_document() -> Document {
    document_with("EFFECTIVE", Some("sop-002.docx"))
}

pub struct FakeEdms {
    user: User,
    document: Mutex<Document>,
    workflow: Option<WorkflowInstance>,
    chain: DependencyChain,
    documents: Vec<Document>,
    download: Option<FetchedFile>,
    refetch_fails: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeEdms {
    pub fn new(user: User, document: Document) -> Self {
        Self {
            user,
            document: Mutex::new(document),
            workflow: Some(WorkflowInstance::default()),
            chain: DependencyChain::default(),
            documents: Vec::new(),
            download: None,
            refetch_fails: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn without_workflow(mut self) -> Self {
        self.workflow = None;
        self
    }

    pub fn with_chain(mut self, chain: DependencyChain) -> Self {
        self.chain = chain;
        self
    }

    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_download(mut self, file: FetchedFile) -> Self {
        self.download = Some(file);
        self
    }

    /// Reads fail once any change has been sent.
    pub fn failing_refetch(mut self) -> Self {
        self.refetch_fails = true;
        self
    }

    pub fn document_uuid(&self) -> Uuid {
        self.document.lock().unwrap().uuid
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn set_status(&self, status: DocumentStatus) {
        self.document.lock().unwrap().status = status;
    }

    fn read_allowed(&self) -> Result<(), EdmsClientError> {
        if self.refetch_fails && !self.calls.lock().unwrap().is_empty() {
            return Err(EdmsClientError::Transport("connection reset".into()));
        }
        Ok(())
    }

    fn check(&self, uuid: Uuid) -> Result<(), EdmsClientError> {
        if uuid == self.document_uuid() {
            Ok(())
        } else {
            Err(EdmsClientError::NotFound)
        }
    }
}

#[async_trait]
impl EdmsClient for FakeEdms {
    async fn ping(&self) -> Result<(), EdmsClientError> {
        Ok(())
    }

    async fn current_user(&self, token: &str) -> Result<User, EdmsClientError> {
        if token.is_empty() {
            return Err(EdmsClientError::Unauthorized("missing token".into()));
        }
        Ok(self.user.clone())
    }

    async fn list_documents(
        &self,
        _token: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, EdmsClientError> {
        self.record(format!("list:{:?}", query.to_pairs()));
        Ok(self.documents.clone())
    }

    async fn get_document(&self, _token: &str, uuid: Uuid) -> Result<Document, EdmsClientError> {
        self.read_allowed()?;
        self.check(uuid)?;
        Ok(self.document.lock().unwrap().clone())
    }

    async fn create_document(
        &self,
        _token: &str,
        form: &CreateDocumentForm,
    ) -> Result<Document, EdmsClientError> {
        self.record(format!("create:{}", form.title));
        let mut doc = self.document.lock().unwrap();
        doc.title = form.title.clone();
        Ok(doc.clone())
    }

    async fn update_document(
        &self,
        _token: &str,
        uuid: Uuid,
        form: &UpdateDocumentForm,
    ) -> Result<Document, EdmsClientError> {
        self.check(uuid)?;
        self.record("update");
        let mut doc = self.document.lock().unwrap();
        if let Some(title) = &form.title {
            doc.title = title.clone();
        }
        Ok(doc.clone())
    }

    async fn dependency_chain(
        &self,
        _token: &str,
        uuid: Uuid,
        max_depth: u32,
    ) -> Result<DependencyChain, EdmsClientError> {
        self.check(uuid)?;
        self.record(format!("chain:{max_depth}"));
        Ok(self.chain.clone())
    }

    async fn workflow_status(
        &self,
        _token: &str,
        _uuid: Uuid,
    ) -> Result<Option<WorkflowInstance>, EdmsClientError> {
        self.read_allowed()?;
        Ok(self.workflow.clone())
    }

    async fn submit_for_review(
        &self,
        _token: &str,
        uuid: Uuid,
        _comment: Option<&str>,
    ) -> Result<(), EdmsClientError> {
        self.check(uuid)?;
        self.record("submit_for_review");
        self.set_status(DocumentStatus::PendingReview);
        Ok(())
    }

    async fn route_for_approval(
        &self,
        _token: &str,
        uuid: Uuid,
        req: &RouteForApprovalRequest,
    ) -> Result<(), EdmsClientError> {
        self.check(uuid)?;
        self.record(format!("route_for_approval:{:?}", req.approver_id));
        self.set_status(DocumentStatus::PendingApproval);
        Ok(())
    }

    async fn create_version(
        &self,
        _token: &str,
        uuid: Uuid,
        req: &CreateVersionRequest,
    ) -> Result<Document, EdmsClientError> {
        self.check(uuid)?;
        self.record(format!("create_version:{:?}", req.version_type));
        let mut doc = self.document.lock().unwrap().clone();
        doc.uuid = Uuid::new_v4();
        doc.document_number = "SOP-002-v2.0".into();
        doc.status = DocumentStatus::Draft;
        Ok(doc)
    }

    async fn mark_obsolete(
        &self,
        _token: &str,
        uuid: Uuid,
        _req: &MarkObsoleteRequest,
    ) -> Result<(), EdmsClientError> {
        self.check(uuid)?;
        self.record("mark_obsolete");
        self.set_status(DocumentStatus::Obsolete);
        Ok(())
    }

    async fn complete_periodic_review(
        &self,
        _token: &str,
        uuid: Uuid,
        req: &PeriodicReviewSubmission,
    ) -> Result<(), EdmsClientError> {
        self.check(uuid)?;
        self.record(format!("periodic_review:{}", req.next_review_months));
        Ok(())
    }

    async fn terminate(&self, _token: &str, id: i64, _reason: &str) -> Result<(), EdmsClientError> {
        self.record(format!("terminate:{id}"));
        self.set_status(DocumentStatus::Terminated);
        Ok(())
    }

    async fn download(
        &self,
        _token: &str,
        id: i64,
        variant: DownloadVariant,
    ) -> Result<FetchedFile, EdmsClientError> {
        self.record(format!("download:{id}:{}", variant.as_str()));
        self.download.clone().ok_or(EdmsClientError::NotFound)
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<ScopedUiEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<ScopedUiEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl UiEventPublisher for RecordingPublisher {
    async fn publish(&self, event: &ScopedUiEvent) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
