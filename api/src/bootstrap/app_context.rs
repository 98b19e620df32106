use std::sync::Arc;

use futures_util::{StreamExt, stream::BoxStream};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::application::ports::edms_client::EdmsClient;
use crate::application::ports::ui_event_publisher::{ScopedUiEvent, UiEventPublisher};
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    edms_client: Arc<dyn EdmsClient>,
    ui_events: broadcast::Sender<ScopedUiEvent>,
    ui_event_publisher: Arc<dyn UiEventPublisher>,
}

impl AppServices {
    pub fn new(
        edms_client: Arc<dyn EdmsClient>,
        ui_events: broadcast::Sender<ScopedUiEvent>,
        ui_event_publisher: Arc<dyn UiEventPublisher>,
    ) -> Self {
        Self {
            edms_client,
            ui_events,
            ui_event_publisher,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn edms_client(&self) -> Arc<dyn EdmsClient> {
        self.services.edms_client.clone()
    }

    pub fn ui_event_publisher(&self) -> Arc<dyn UiEventPublisher> {
        self.services.ui_event_publisher.clone()
    }

    /// Lagged receivers skip the events they missed.
    pub fn subscribe_ui_events(&self) -> BoxStream<'static, ScopedUiEvent> {
        BroadcastStream::new(self.services.ui_events.subscribe())
            .filter_map(|evt| async move { evt.ok() })
            .boxed()
    }
}
