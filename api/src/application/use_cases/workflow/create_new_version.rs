use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::documents::CreateVersionRequest;
use crate::application::ports::edms_client::EdmsClient;
use crate::application::ports::ui_event_publisher::UiEventPublisher;
use crate::application::use_cases::announce::announce_change;
use crate::application::use_cases::documents::get_document_view::{DocumentView, GetDocumentView};
use crate::application::use_cases::error::UseCaseError;
use crate::application::validation;
use crate::application::workflow::ActionKey;

pub struct CreateNewVersion<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    pub client: &'a C,
    pub events: &'a P,
}

impl<'a, C, P> CreateNewVersion<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    /// Returns the view of the new draft version.
    pub async fn execute(
        &self,
        token: &str,
        uuid: Uuid,
        req: &CreateVersionRequest,
    ) -> Result<DocumentView, UseCaseError> {
        validation::validate_create_version(req)?;
        let views = GetDocumentView {
            client: self.client,
        };
        let view = views.execute(token, uuid, Utc::now()).await?;
        view.require(ActionKey::CreateNewVersion)?;
        let created = self.client.create_version(token, uuid, req).await?;
        tracing::info!(
            from = %view.document.document_number,
            to = %created.document_number,
            "version_created"
        );
        announce_change(self.events, Some(view.user.id), uuid, false).await;
        announce_change(self.events, Some(view.user.id), created.uuid, false).await;
        match self.client.workflow_status(token, created.uuid).await {
            Ok(workflow) => Ok(DocumentView::build(created, view.user, workflow, Utc::now())),
            Err(error) => {
                tracing::warn!(uuid = %created.uuid, error = %error, "document_refetch_failed");
                Ok(DocumentView::build(created, view.user, None, Utc::now()).into_stale())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::documents::VersionBump;
    use crate::application::use_cases::testing::{
        FakeEdms, RecordingPublisher, draft_document, effective_document, reviewer,
    };
    use crate::domain::documents::status::DocumentStatus;

    fn request() -> CreateVersionRequest {
        CreateVersionRequest {
            version_type: VersionBump::Major,
            change_summary: "Align with new line layout".into(),
            reason_for_change: None,
        }
    }

    #[tokio::test]
    async fn any_user_versions_an_effective_document() {
        let fake = FakeEdms::new(reviewer(), effective_document());
        let events = RecordingPublisher::default();
        let view = CreateNewVersion {
            client: &fake,
            events: &events,
        }
        .execute("tok", fake.document_uuid(), &request())
        .await
        .unwrap();
        assert_eq!(view.document.document_number, "SOP-002-v2.0");
        assert_eq!(view.document.status, DocumentStatus::Draft);
        assert_eq!(fake.calls(), vec!["create_version:Major".to_string()]);
        assert_eq!(events.events().len(), 4);
    }

    #[tokio::test]
    async fn created_version_is_returned_when_its_workflow_cannot_be_read() {
        let fake = FakeEdms::new(reviewer(), effective_document()).failing_refetch();
        let events = RecordingPublisher::default();
        let view = CreateNewVersion {
            client: &fake,
            events: &events,
        }
        .execute("tok", fake.document_uuid(), &request())
        .await
        .unwrap();
        assert!(view.stale);
        assert_eq!(view.document.document_number, "SOP-002-v2.0");
        assert_eq!(events.events().len(), 4);
    }

    #[tokio::test]
    async fn drafts_cannot_be_versioned() {
        let fake = FakeEdms::new(reviewer(), draft_document());
        let events = RecordingPublisher::default();
        let err = CreateNewVersion {
            client: &fake,
            events: &events,
        }
        .execute("tok", fake.document_uuid(), &request())
        .await
        .unwrap_err();
        assert!(matches!(err, UseCaseError::NotAvailable("create_new_version")));
    }
}
