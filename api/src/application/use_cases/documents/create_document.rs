use chrono::Utc;

use crate::application::dto::documents::CreateDocumentForm;
use crate::application::ports::edms_client::EdmsClient;
use crate::application::ports::ui_event_publisher::UiEventPublisher;
use crate::application::use_cases::announce::announce_change;
use crate::application::use_cases::documents::get_document_view::{DocumentView, GetDocumentView};
use crate::application::use_cases::error::UseCaseError;
use crate::application::validation;

pub struct CreateDocument<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    pub client: &'a C,
    pub events: &'a P,
}

impl<'a, C, P> CreateDocument<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    pub async fn execute(
        &self,
        token: &str,
        form: &CreateDocumentForm,
    ) -> Result<DocumentView, UseCaseError> {
        validation::validate_create(form)?;
        let user = self.client.current_user(token).await?;
        let document = self.client.create_document(token, form).await?;
        tracing::info!(document_number = %document.document_number, uuid = %document.uuid, "document_created");
        announce_change(self.events, None, document.uuid, false).await;
        let uuid = document.uuid;
        let previous = DocumentView::build(document, user, None, Utc::now());
        let views = GetDocumentView {
            client: self.client,
        };
        Ok(views.refresh(token, uuid, previous).await)
    }
}
