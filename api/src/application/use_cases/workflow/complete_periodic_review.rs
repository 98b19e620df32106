use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::documents::PeriodicReviewRequest;
use crate::application::ports::edms_client::EdmsClient;
use crate::application::ports::ui_event_publisher::UiEventPublisher;
use crate::application::use_cases::announce::announce_change;
use crate::application::use_cases::documents::get_document_view::{DocumentView, GetDocumentView};
use crate::application::use_cases::error::UseCaseError;
use crate::application::validation;
use crate::application::workflow::ActionKey;

pub struct CompletePeriodicReview<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    pub client: &'a C,
    pub events: &'a P,
}

impl<'a, C, P> CompletePeriodicReview<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    pub async fn execute(
        &self,
        token: &str,
        uuid: Uuid,
        req: &PeriodicReviewRequest,
    ) -> Result<DocumentView, UseCaseError> {
        let submission = validation::validate_periodic_review(req)?;
        let views = GetDocumentView {
            client: self.client,
        };
        let view = views.execute(token, uuid, Utc::now()).await?;
        view.require(ActionKey::CompletePeriodicReview)?;
        self.client
            .complete_periodic_review(token, uuid, &submission)
            .await?;
        tracing::info!(
            %uuid,
            outcome = ?submission.outcome,
            next_review_months = submission.next_review_months,
            "periodic_review_completed"
        );
        announce_change(self.events, Some(view.user.id), uuid, false).await;
        Ok(views.refresh(token, uuid, view).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::documents::ReviewOutcome;
    use crate::application::use_cases::testing::{
        FakeEdms, RecordingPublisher, document_with, effective_document, reviewer,
    };

    fn confirmed() -> PeriodicReviewRequest {
        PeriodicReviewRequest {
            outcome: ReviewOutcome::Confirmed,
            comments: String::new(),
            next_review_months: Some(24),
        }
    }

    #[tokio::test]
    async fn due_review_is_recorded() {
        // next_review_date in the fixture is already past
        let fake = FakeEdms::new(reviewer(), effective_document());
        let events = RecordingPublisher::default();
        CompletePeriodicReview {
            client: &fake,
            events: &events,
        }
        .execute("tok", fake.document_uuid(), &confirmed())
        .await
        .unwrap();
        assert_eq!(fake.calls(), vec!["periodic_review:24".to_string()]);
    }

    #[tokio::test]
    async fn review_not_due_is_rejected() {
        let mut doc = document_with("EFFECTIVE", Some("a.pdf"));
        doc.next_review_date = None;
        let fake = FakeEdms::new(reviewer(), doc);
        let events = RecordingPublisher::default();
        let err = CompletePeriodicReview {
            client: &fake,
            events: &events,
        }
        .execute("tok", fake.document_uuid(), &confirmed())
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            UseCaseError::NotAvailable("complete_periodic_review")
        ));
    }
}
