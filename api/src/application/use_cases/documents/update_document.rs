use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::documents::UpdateDocumentForm;
use crate::application::ports::edms_client::EdmsClient;
use crate::application::ports::ui_event_publisher::UiEventPublisher;
use crate::application::use_cases::announce::announce_change;
use crate::application::use_cases::documents::get_document_view::{DocumentView, GetDocumentView};
use crate::application::use_cases::error::UseCaseError;
use crate::application::validation;

pub struct UpdateDocument<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    pub client: &'a C,
    pub events: &'a P,
}

impl<'a, C, P> UpdateDocument<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    pub async fn execute(
        &self,
        token: &str,
        uuid: Uuid,
        form: &UpdateDocumentForm,
    ) -> Result<DocumentView, UseCaseError> {
        validation::validate_update(form)?;
        let views = GetDocumentView {
            client: self.client,
        };
        let view = views.execute(token, uuid, Utc::now()).await?;
        if !view.gates.can_edit {
            return Err(UseCaseError::NotAvailable("edit_document"));
        }
        let updated = self.client.update_document(token, uuid, form).await?;
        announce_change(self.events, Some(view.user.id), uuid, false).await;
        let previous = DocumentView::build(updated, view.user, view.workflow, Utc::now());
        Ok(views.refresh(token, uuid, previous).await)
    }
}
