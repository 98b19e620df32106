use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::documents::SubmitForReviewRequest;
use crate::application::ports::edms_client::EdmsClient;
use crate::application::ports::ui_event_publisher::UiEventPublisher;
use crate::application::use_cases::announce::announce_change;
use crate::application::use_cases::documents::get_document_view::{DocumentView, GetDocumentView};
use crate::application::use_cases::error::UseCaseError;
use crate::application::workflow::ActionKey;

pub struct SubmitForReview<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    pub client: &'a C,
    pub events: &'a P,
}

impl<'a, C, P> SubmitForReview<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    pub async fn execute(
        &self,
        token: &str,
        uuid: Uuid,
        req: &SubmitForReviewRequest,
    ) -> Result<DocumentView, UseCaseError> {
        let views = GetDocumentView {
            client: self.client,
        };
        let view = views.execute(token, uuid, Utc::now()).await?;
        view.require(ActionKey::SubmitForReview)?;
        let comment = req
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        self.client.submit_for_review(token, uuid, comment).await?;
        tracing::info!(%uuid, user_id = %view.user.id, "submitted_for_review");
        announce_change(self.events, Some(view.user.id), uuid, false).await;
        Ok(views.refresh(token, uuid, view).await)
    }
}
