use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::documents::TerminateRequest;
use crate::application::ports::edms_client::EdmsClient;
use crate::application::ports::ui_event_publisher::UiEventPublisher;
use crate::application::use_cases::announce::announce_change;
use crate::application::use_cases::documents::get_document_view::{DocumentView, GetDocumentView};
use crate::application::use_cases::error::UseCaseError;
use crate::application::validation;
use crate::application::workflow::ActionKey;

/// Irreversible. The request carries a typed confirmation that is checked
/// before anything is sent to the EDMS API.
pub struct TerminateDocument<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    pub client: &'a C,
    pub events: &'a P,
}

impl<'a, C, P> TerminateDocument<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    pub async fn execute(
        &self,
        token: &str,
        uuid: Uuid,
        req: &TerminateRequest,
    ) -> Result<DocumentView, UseCaseError> {
        validation::validate_terminate(req)?;
        let views = GetDocumentView {
            client: self.client,
        };
        let view = views.execute(token, uuid, Utc::now()).await?;
        view.require(ActionKey::TerminateDocument)?;
        self.client
            .terminate(token, view.document.id, req.reason.trim())
            .await?;
        tracing::warn!(
            %uuid,
            document_number = %view.document.document_number,
            user_id = %view.user.id,
            "document_terminated"
        );
        announce_change(self.events, Some(view.user.id), uuid, true).await;
        Ok(views.refresh(token, uuid, view).await)
    }
}
