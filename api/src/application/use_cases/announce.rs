use uuid::Uuid;

use crate::application::ports::ui_event_publisher::{ScopedUiEvent, UiEvent, UiEventPublisher};
use crate::domain::users::user::UserId;

/// Tells listening UIs that a document changed. Publishing is best effort;
/// a failure is logged and never fails the mutation that caused it.
pub(crate) async fn announce_change<P: UiEventPublisher + ?Sized>(
    events: &P,
    actor: Option<UserId>,
    document_uuid: Uuid,
    clear_selection: bool,
) {
    let mut batch = vec![
        ScopedUiEvent {
            user_id: None,
            event: UiEvent::DocumentUpdated { document_uuid },
        },
        ScopedUiEvent {
            user_id: None,
            event: UiEvent::BadgeRefresh,
        },
    ];
    if clear_selection {
        batch.push(ScopedUiEvent {
            user_id: actor,
            event: UiEvent::ClearDocumentSelection,
        });
    }
    for event in &batch {
        if let Err(e) = events.publish(event).await {
            tracing::warn!(error = ?e, event = event.event.name(), "ui_event_publish_failed");
        }
    }
}
