use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::documents::MarkObsoleteRequest;
use crate::application::ports::edms_client::EdmsClient;
use crate::application::ports::ui_event_publisher::UiEventPublisher;
use crate::application::use_cases::announce::announce_change;
use crate::application::use_cases::documents::get_document_view::{DocumentView, GetDocumentView};
use crate::application::use_cases::error::UseCaseError;
use crate::application::validation;
use crate::application::workflow::ActionKey;

pub struct MarkObsolete<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    pub client: &'a C,
    pub events: &'a P,
}

impl<'a, C, P> MarkObsolete<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    pub async fn execute(
        &self,
        token: &str,
        uuid: Uuid,
        req: &MarkObsoleteRequest,
    ) -> Result<DocumentView, UseCaseError> {
        validation::validate_mark_obsolete(req)?;
        let views = GetDocumentView {
            client: self.client,
        };
        let view = views.execute(token, uuid, Utc::now()).await?;
        view.require(ActionKey::MarkObsolete)?;
        self.client.mark_obsolete(token, uuid, req).await?;
        tracing::info!(%uuid, user_id = %view.user.id, "marked_obsolete");
        announce_change(self.events, Some(view.user.id), uuid, true).await;
        Ok(views.refresh(token, uuid, view).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ui_event_publisher::UiEvent;
    use crate::application::use_cases::testing::{
        FakeEdms, RecordingPublisher, approver, effective_document, reviewer,
    };
    use crate::domain::documents::status::DocumentStatus;

    fn request() -> MarkObsoleteRequest {
        MarkObsoleteRequest {
            reason: "Replaced by WI-200".into(),
            effective_date: None,
        }
    }

    #[tokio::test]
    async fn assigned_approver_retires_document() {
        let fake = FakeEdms::new(approver(), effective_document());
        let events = RecordingPublisher::default();
        let view = MarkObsolete {
            client: &fake,
            events: &events,
        }
        .execute("tok", fake.document_uuid(), &request())
        .await
        .unwrap();
        assert_eq!(view.document.status, DocumentStatus::Obsolete);
        assert!(view.actions.is_empty());
        let recorded = events.events();
        let clear = recorded.last().unwrap();
        assert_eq!(clear.event, UiEvent::ClearDocumentSelection);
        assert_eq!(clear.user_id, Some(approver().id));
    }

    #[tokio::test]
    async fn plain_user_cannot_retire_document() {
        let fake = FakeEdms::new(reviewer(), effective_document());
        let events = RecordingPublisher::default();
        let err = MarkObsolete {
            client: &fake,
            events: &events,
        }
        .execute("tok", fake.document_uuid(), &request())
        .await
        .unwrap_err();
        assert!(matches!(err, UseCaseError::NotAvailable("mark_obsolete")));
        assert!(fake.calls().is_empty());
    }
}
