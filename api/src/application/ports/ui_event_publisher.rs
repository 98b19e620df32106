use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::users::user::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    BadgeRefresh,
    DocumentUpdated { document_uuid: Uuid },
    ClearDocumentSelection,
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::BadgeRefresh => "badge_refresh",
            UiEvent::DocumentUpdated { .. } => "document_updated",
            UiEvent::ClearDocumentSelection => "clear_document_selection",
        }
    }
}

/// An event plus the user it is meant for; `None` reaches every listener.
#[derive(Debug, Clone)]
pub struct ScopedUiEvent {
    pub user_id: Option<UserId>,
    pub event: UiEvent,
}

#[async_trait]
pub trait UiEventPublisher: Send + Sync {
    async fn publish(&self, event: &ScopedUiEvent) -> anyhow::Result<()>;
}
