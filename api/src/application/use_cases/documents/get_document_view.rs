use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::edms_client::EdmsClient;
use crate::application::use_cases::error::UseCaseError;
use crate::application::workflow::{
    self, ActionKey, DocumentGates, RoleFlags, WorkflowAction,
};
use crate::domain::documents::document::Document;
use crate::domain::users::user::User;
use crate::domain::workflow::instance::WorkflowInstance;

/// A document as the current user sees it: what they are to it and what
/// they may do next.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    pub document: Document,
    pub user: User,
    pub workflow: Option<WorkflowInstance>,
    pub flags: RoleFlags,
    pub gates: DocumentGates,
    pub actions: Vec<WorkflowAction>,
    /// Set when the view could not be re-read after a committed change.
    pub stale: bool,
}

impl DocumentView {
    pub fn build(
        document: Document,
        user: User,
        workflow: Option<WorkflowInstance>,
        now: DateTime<Utc>,
    ) -> Self {
        let flags = RoleFlags::derive(&document, &user);
        let gates = DocumentGates::derive(&document, &user, workflow.as_ref());
        let actions = workflow::resolve_actions(Some(&document), Some(&user), workflow.as_ref(), now);
        Self {
            document,
            user,
            workflow,
            flags,
            gates,
            actions,
            stale: false,
        }
    }

    /// The offered actions no longer hold once the document has changed.
    pub fn into_stale(mut self) -> Self {
        self.actions.clear();
        self.stale = true;
        self
    }

    pub fn offers(&self, key: ActionKey) -> bool {
        self.actions.iter().any(|a| a.key == key)
    }

    pub fn require(&self, key: ActionKey) -> Result<(), UseCaseError> {
        if self.offers(key) {
            Ok(())
        } else {
            Err(UseCaseError::NotAvailable(key.as_str()))
        }
    }
}

pub struct GetDocumentView<'a, C: EdmsClient + ?Sized> {
    pub client: &'a C,
}

impl<'a, C: EdmsClient + ?Sized> GetDocumentView<'a, C> {
    pub async fn execute(
        &self,
        token: &str,
        uuid: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DocumentView, UseCaseError> {
        let (document, user, workflow) = tokio::try_join!(
            self.client.get_document(token, uuid),
            self.client.current_user(token),
            self.client.workflow_status(token, uuid),
        )?;
        Ok(DocumentView::build(document, user, workflow, now))
    }

    /// Re-reads the view after a change the EDMS API has already accepted.
    /// A failed read falls back to `previous`, marked stale.
    pub async fn refresh(&self, token: &str, uuid: Uuid, previous: DocumentView) -> DocumentView {
        match self.execute(token, uuid, Utc::now()).await {
            Ok(view) => view,
            Err(error) => {
                tracing::warn!(%uuid, error = %error, "document_refetch_failed");
                previous.into_stale()
            }
        }
    }
}
