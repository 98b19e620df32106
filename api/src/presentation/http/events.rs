use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures_util::stream::{self, Stream, StreamExt};

use crate::application::ports::ui_event_publisher::ScopedUiEvent;
use crate::application::use_cases::auth::me::GetMe;
use crate::bootstrap::app_context::AppContext;
use crate::domain::users::user::UserId;
use crate::presentation::http::auth::Bearer;
use crate::presentation::http::error::ApiError;

pub fn routes(ctx: AppContext) -> Router {
    Router::new().route("/events", get(ui_events)).with_state(ctx)
}

fn to_sse(event: &ScopedUiEvent) -> Option<Event> {
    Event::default()
        .event(event.event.name())
        .json_data(&event.event)
        .map_err(|e| tracing::warn!(error = ?e, "ui_event_encode_failed"))
        .ok()
}

fn is_for(event: &ScopedUiEvent, user_id: UserId) -> bool {
    event.user_id.is_none_or(|id| id == user_id)
}

/// Server-sent UI events for the caller: broadcast events plus the ones
/// scoped to them. The first event is always `ready`.
#[utoipa::path(get, path = "/api/events", tag = "Events",
    responses((status = 200, description = "text/event-stream of UI events")))]
pub async fn ui_events(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let client = ctx.edms_client();
    let user = GetMe {
        client: client.as_ref(),
    }
    .execute(&bearer.0)
    .await?;
    let user_id = user.id;
    tracing::debug!(%user_id, "ui_event_stream_opened");

    let initial = stream::iter(vec![Ok(Event::default().event("ready").data("{}"))]);
    let updates = ctx.subscribe_ui_events().filter_map(move |ev| async move {
        if !is_for(&ev, user_id) {
            return None;
        }
        to_sse(&ev).map(Ok)
    });
    let keepalive = KeepAlive::new()
        .interval(Duration::from_secs(ctx.cfg.sse_keepalive_secs))
        .text(":\n");
    Ok(Sse::new(initial.chain(updates)).keep_alive(keepalive))
}
