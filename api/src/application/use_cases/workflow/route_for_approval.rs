use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::documents::RouteForApprovalRequest;
use crate::application::ports::edms_client::EdmsClient;
use crate::application::ports::ui_event_publisher::UiEventPublisher;
use crate::application::use_cases::announce::announce_change;
use crate::application::use_cases::documents::get_document_view::{DocumentView, GetDocumentView};
use crate::application::use_cases::error::UseCaseError;
use crate::application::validation;
use crate::application::workflow::ActionKey;

pub struct RouteForApproval<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    pub client: &'a C,
    pub events: &'a P,
}

impl<'a, C, P> RouteForApproval<'a, C, P>
where
    C: EdmsClient + ?Sized,
    P: UiEventPublisher + ?Sized,
{
    pub async fn execute(
        &self,
        token: &str,
        uuid: Uuid,
        req: &RouteForApprovalRequest,
    ) -> Result<DocumentView, UseCaseError> {
        validation::validate_route_for_approval(req)?;
        let views = GetDocumentView {
            client: self.client,
        };
        let view = views.execute(token, uuid, Utc::now()).await?;
        view.require(ActionKey::RouteForApproval)?;
        self.client.route_for_approval(token, uuid, req).await?;
        tracing::info!(%uuid, approver_id = ?req.approver_id, "routed_for_approval");
        announce_change(self.events, Some(view.user.id), uuid, false).await;
        Ok(views.refresh(token, uuid, view).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::testing::{
        FakeEdms, RecordingPublisher, author, document_with, reviewer,
    };
    use crate::domain::documents::status::DocumentStatus;

    fn request() -> RouteForApprovalRequest {
        RouteForApprovalRequest {
            approver_id: Some(3),
            comment: Some("Ready".into()),
        }
    }

    #[tokio::test]
    async fn author_routes_reviewed_document() {
        let fake = FakeEdms::new(author(), document_with("REVIEWED", Some("a.docx")));
        let events = RecordingPublisher::default();
        let view = RouteForApproval {
            client: &fake,
            events: &events,
        }
        .execute("tok", fake.document_uuid(), &request())
        .await
        .unwrap();
        assert_eq!(view.document.status, DocumentStatus::PendingApproval);
        assert_eq!(fake.calls(), vec!["route_for_approval:Some(3)".to_string()]);
    }

    #[tokio::test]
    async fn reviewer_cannot_route() {
        let fake = FakeEdms::new(reviewer(), document_with("REVIEW_COMPLETED", Some("a.docx")));
        let events = RecordingPublisher::default();
        let err = RouteForApproval {
            client: &fake,
            events: &events,
        }
        .execute("tok", fake.document_uuid(), &request())
        .await
        .unwrap_err();
        assert!(matches!(err, UseCaseError::NotAvailable("route_for_approval")));
    }

    #[tokio::test]
    async fn approver_is_required() {
        let fake = FakeEdms::new(author(), document_with("REVIEWED", Some("a.docx")));
        let events = RecordingPublisher::default();
        let err = RouteForApproval {
            client: &fake,
            events: &events,
        }
        .execute("tok", fake.document_uuid(), &RouteForApprovalRequest::default())
        .await
        .unwrap_err();
        assert!(matches!(err, UseCaseError::Validation(_)));
    }
}
