use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::application::ports::ui_event_publisher::{ScopedUiEvent, UiEventPublisher};

#[derive(Clone)]
pub struct BroadcastUiEventPublisher {
    sender: broadcast::Sender<ScopedUiEvent>,
}

impl BroadcastUiEventPublisher {
    pub fn new(sender: broadcast::Sender<ScopedUiEvent>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl UiEventPublisher for BroadcastUiEventPublisher {
    async fn publish(&self, event: &ScopedUiEvent) -> anyhow::Result<()> {
        match self.sender.send(event.clone()) {
            Ok(_) => Ok(()),
            // Nobody listening is not an error for the mutation that raised it.
            Err(broadcast::error::SendError(_)) => Ok(()),
        }
    }
}
