use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tokio::sync::broadcast;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use edms_api::application::ports::edms_client::EdmsClient;
use edms_api::application::ports::ui_event_publisher::UiEventPublisher;
use edms_api::bootstrap::app_context::{AppContext, AppServices};
use edms_api::bootstrap::config::Config;
use edms_api::infrastructure::edms::client_reqwest::ReqwestEdmsClient;
use edms_api::infrastructure::events::publisher_broadcast::BroadcastUiEventPublisher;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            edms_api::presentation::http::auth::me,
            edms_api::presentation::http::documents::list_documents,
            edms_api::presentation::http::documents::list_version_groups,
            edms_api::presentation::http::documents::create_document,
            edms_api::presentation::http::documents::get_document,
            edms_api::presentation::http::documents::update_document,
            edms_api::presentation::http::documents::get_document_actions,
            edms_api::presentation::http::documents::get_dependency_graph,
            edms_api::presentation::http::documents::download_document,
            edms_api::presentation::http::workflow::submit_for_review,
            edms_api::presentation::http::workflow::route_for_approval,
            edms_api::presentation::http::workflow::create_version,
            edms_api::presentation::http::workflow::mark_obsolete,
            edms_api::presentation::http::workflow::complete_periodic_review,
            edms_api::presentation::http::workflow::terminate_document,
            edms_api::presentation::http::events::ui_events,
            edms_api::presentation::http::health::health,
        ),
        components(schemas(
            edms_api::presentation::http::auth::UserResponse,
            edms_api::presentation::http::documents::DocumentListResponse,
            edms_api::presentation::http::documents::DocumentViewResponse,
            edms_api::presentation::http::documents::DocumentActionsResponse,
            edms_api::presentation::http::documents::VersionGroupsResponse,
            edms_api::presentation::http::documents::DependencyGraphResponse,
            edms_api::presentation::http::documents::DocumentFormMultipart,
            edms_api::presentation::http::documents::DocumentFileBinary,
            edms_api::presentation::http::workflow::SubmitForReviewBody,
            edms_api::presentation::http::workflow::RouteForApprovalBody,
            edms_api::presentation::http::workflow::CreateVersionBody,
            edms_api::presentation::http::workflow::MarkObsoleteBody,
            edms_api::presentation::http::workflow::PeriodicReviewBody,
            edms_api::presentation::http::workflow::TerminateBody,
            edms_api::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Auth", description = "Current EDMS user"),
            (name = "Documents", description = "Controlled documents"),
            (name = "Workflow", description = "Lifecycle actions and transitions"),
            (name = "Events", description = "UI event stream"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

fn cors_layer(cfg: &Config) -> CorsLayer {
    let methods = [
        http::Method::GET,
        http::Method::POST,
        http::Method::PATCH,
        http::Method::OPTIONS,
    ];
    let headers = [http::header::CONTENT_TYPE, http::header::AUTHORIZATION];
    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
        // Production refuses to start without FRONTEND_URL, so this only
        // guards a malformed value.
        _ if cfg.is_production => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(HeaderValue::from_static(
                "http://invalid",
            )))
            .allow_methods(methods)
            .allow_headers(headers),
        _ => CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "edms_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting EDMS gateway");

    let edms_client: Arc<dyn EdmsClient> = Arc::new(ReqwestEdmsClient::new(&cfg.edms_api_url));
    let (ui_events, _) = broadcast::channel(cfg.event_bus_capacity);
    let ui_event_publisher: Arc<dyn UiEventPublisher> =
        Arc::new(BroadcastUiEventPublisher::new(ui_events.clone()));

    if let Err(e) = edms_client.ping().await {
        tracing::warn!(error = ?e, url = %cfg.edms_api_url, "edms_api_unreachable_at_startup");
    }

    let services = AppServices::new(edms_client, ui_events, ui_event_publisher);
    let ctx = AppContext::new(cfg.clone(), services);

    let api_router = Router::new()
        .nest("/api", edms_api::presentation::http::health::routes(ctx.clone()))
        .nest("/api", edms_api::presentation::http::auth::routes(ctx.clone()))
        .nest(
            "/api",
            edms_api::presentation::http::documents::routes(ctx.clone()),
        )
        .nest(
            "/api",
            edms_api::presentation::http::workflow::routes(ctx.clone()),
        )
        .nest("/api", edms_api::presentation::http::events::routes(ctx.clone()))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(&cfg))
        .layer(DefaultBodyLimit::max(cfg.upload_max_bytes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, edms_api_url = %cfg.edms_api_url, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(?e, "Failed to listen for shutdown signal");
        }
        info!("shutdown_requested");
    };
    if let Err(e) = axum::serve(listener, api_router)
        .with_graceful_shutdown(shutdown)
        .await
    {
        error!(?e, "API server failed");
        return Err(e.into());
    }
    Ok(())
}
