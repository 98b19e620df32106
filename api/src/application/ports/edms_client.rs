use async_trait::async_trait;
use uuid::Uuid;

use crate::application::dto::documents::{
    CreateDocumentForm, CreateVersionRequest, DocumentQuery, DownloadVariant, FetchedFile,
    MarkObsoleteRequest, PeriodicReviewSubmission, RouteForApprovalRequest, UpdateDocumentForm,
};
use crate::domain::documents::dependency::DependencyChain;
use crate::domain::documents::document::Document;
use crate::domain::users::user::User;
use crate::domain::workflow::instance::WorkflowInstance;

#[derive(thiserror::Error, Debug)]
pub enum EdmsClientError {
    #[error("not authenticated: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found")]
    NotFound,
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("EDMS API unreachable: {0}")]
    Transport(String),
    #[error("unexpected EDMS API response: {0}")]
    Decode(String),
}

/// The EDMS REST API. Every call is made on behalf of the holder of `token`.
#[async_trait]
pub trait EdmsClient: Send + Sync {
    async fn ping(&self) -> Result<(), EdmsClientError>;

    async fn current_user(&self, token: &str) -> Result<User, EdmsClientError>;

    async fn list_documents(
        &self,
        token: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, EdmsClientError>;

    async fn get_document(&self, token: &str, uuid: Uuid) -> Result<Document, EdmsClientError>;

    async fn create_document(
        &self,
        token: &str,
        form: &CreateDocumentForm,
    ) -> Result<Document, EdmsClientError>;

    async fn update_document(
        &self,
        token: &str,
        uuid: Uuid,
        form: &UpdateDocumentForm,
    ) -> Result<Document, EdmsClientError>;

    async fn dependency_chain(
        &self,
        token: &str,
        uuid: Uuid,
        max_depth: u32,
    ) -> Result<DependencyChain, EdmsClientError>;

    // None when the document has no workflow yet
    async fn workflow_status(
        &self,
        token: &str,
        uuid: Uuid,
    ) -> Result<Option<WorkflowInstance>, EdmsClientError>;

    async fn submit_for_review(
        &self,
        token: &str,
        uuid: Uuid,
        comment: Option<&str>,
    ) -> Result<(), EdmsClientError>;

    async fn route_for_approval(
        &self,
        token: &str,
        uuid: Uuid,
        req: &RouteForApprovalRequest,
    ) -> Result<(), EdmsClientError>;

    async fn create_version(
        &self,
        token: &str,
        uuid: Uuid,
        req: &CreateVersionRequest,
    ) -> Result<Document, EdmsClientError>;

    async fn mark_obsolete(
        &self,
        token: &str,
        uuid: Uuid,
        req: &MarkObsoleteRequest,
    ) -> Result<(), EdmsClientError>;

    async fn complete_periodic_review(
        &self,
        token: &str,
        uuid: Uuid,
        req: &PeriodicReviewSubmission,
    ) -> Result<(), EdmsClientError>;

    async fn terminate(&self, token: &str, id: i64, reason: &str) -> Result<(), EdmsClientError>;

    async fn download(
        &self,
        token: &str,
        id: i64,
        variant: DownloadVariant,
    ) -> Result<FetchedFile, EdmsClientError>;
}
