use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::dto::documents::{
    CreateVersionRequest, MarkObsoleteRequest, PeriodicReviewRequest, ReviewOutcome,
    RouteForApprovalRequest, SubmitForReviewRequest, TerminateRequest, VersionBump,
};
use crate::application::use_cases::workflow::complete_periodic_review::CompletePeriodicReview;
use crate::application::use_cases::workflow::create_new_version::CreateNewVersion;
use crate::application::use_cases::workflow::mark_obsolete::MarkObsolete;
use crate::application::use_cases::workflow::route_for_approval::RouteForApproval;
use crate::application::use_cases::workflow::submit_for_review::SubmitForReview;
use crate::application::use_cases::workflow::terminate_document::TerminateDocument;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::Bearer;
use crate::presentation::http::documents::DocumentViewResponse;
use crate::presentation::http::error::ApiError;

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/documents/:uuid/submit-for-review", post(submit_for_review))
        .route("/documents/:uuid/route-for-approval", post(route_for_approval))
        .route("/documents/:uuid/create-version", post(create_version))
        .route("/documents/:uuid/mark-obsolete", post(mark_obsolete))
        .route("/documents/:uuid/periodic-review", post(complete_periodic_review))
        .route("/documents/:uuid/terminate", post(terminate_document))
        .with_state(ctx)
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubmitForReviewBody {
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RouteForApprovalBody {
    pub approver_id: Option<i64>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVersionBody {
    /// `major` or `minor`
    #[schema(value_type = String)]
    pub version_type: VersionBump,
    pub change_summary: String,
    pub reason_for_change: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkObsoleteBody {
    pub reason: String,
    pub effective_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PeriodicReviewBody {
    /// `CONFIRMED` or `UPVERSION_REQUIRED`
    #[schema(value_type = String)]
    pub outcome: ReviewOutcome,
    #[serde(default)]
    pub comments: String,
    /// Months until the next review, 1 to 120; defaults to 12
    pub next_review_months: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TerminateBody {
    #[serde(default)]
    pub reason: String,
    /// Must be the literal text `TERMINATE`
    #[serde(default)]
    pub confirmation: String,
}

#[utoipa::path(post, path = "/api/documents/{uuid}/submit-for-review", tag = "Workflow",
    params(("uuid" = Uuid, Path, description = "Document UUID"),),
    request_body = SubmitForReviewBody,
    responses((status = 200, body = DocumentViewResponse), (status = 409, description = "Action not available")))]
pub async fn submit_for_review(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(uuid): Path<Uuid>,
    body: Option<Json<SubmitForReviewBody>>,
) -> Result<Json<DocumentViewResponse>, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let client = ctx.edms_client();
    let events = ctx.ui_event_publisher();
    let uc = SubmitForReview {
        client: client.as_ref(),
        events: events.as_ref(),
    };
    let req = SubmitForReviewRequest {
        comment: body.comment,
    };
    let view = uc.execute(&bearer.0, uuid, &req).await?;
    Ok(Json(view.into()))
}

#[utoipa::path(post, path = "/api/documents/{uuid}/route-for-approval", tag = "Workflow",
    params(("uuid" = Uuid, Path, description = "Document UUID"),),
    request_body = RouteForApprovalBody,
    responses((status = 200, body = DocumentViewResponse), (status = 422, description = "Approver missing")))]
pub async fn route_for_approval(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(uuid): Path<Uuid>,
    Json(body): Json<RouteForApprovalBody>,
) -> Result<Json<DocumentViewResponse>, ApiError> {
    let client = ctx.edms_client();
    let events = ctx.ui_event_publisher();
    let uc = RouteForApproval {
        client: client.as_ref(),
        events: events.as_ref(),
    };
    let req = RouteForApprovalRequest {
        approver_id: body.approver_id,
        comment: body.comment,
    };
    let view = uc.execute(&bearer.0, uuid, &req).await?;
    Ok(Json(view.into()))
}

#[utoipa::path(post, path = "/api/documents/{uuid}/create-version", tag = "Workflow",
    params(("uuid" = Uuid, Path, description = "Document UUID"),),
    request_body = CreateVersionBody,
    responses((status = 201, description = "View of the new draft version", body = DocumentViewResponse)))]
pub async fn create_version(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(uuid): Path<Uuid>,
    Json(body): Json<CreateVersionBody>,
) -> Result<(axum::http::StatusCode, Json<DocumentViewResponse>), ApiError> {
    let client = ctx.edms_client();
    let events = ctx.ui_event_publisher();
    let uc = CreateNewVersion {
        client: client.as_ref(),
        events: events.as_ref(),
    };
    let req = CreateVersionRequest {
        version_type: body.version_type,
        change_summary: body.change_summary,
        reason_for_change: body.reason_for_change,
    };
    let view = uc.execute(&bearer.0, uuid, &req).await?;
    Ok((axum::http::StatusCode::CREATED, Json(view.into())))
}

#[utoipa::path(post, path = "/api/documents/{uuid}/mark-obsolete", tag = "Workflow",
    params(("uuid" = Uuid, Path, description = "Document UUID"),),
    request_body = MarkObsoleteBody,
    responses((status = 200, body = DocumentViewResponse)))]
pub async fn mark_obsolete(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(uuid): Path<Uuid>,
    Json(body): Json<MarkObsoleteBody>,
) -> Result<Json<DocumentViewResponse>, ApiError> {
    let client = ctx.edms_client();
    let events = ctx.ui_event_publisher();
    let uc = MarkObsolete {
        client: client.as_ref(),
        events: events.as_ref(),
    };
    let req = MarkObsoleteRequest {
        reason: body.reason,
        effective_date: body.effective_date,
    };
    let view = uc.execute(&bearer.0, uuid, &req).await?;
    Ok(Json(view.into()))
}

#[utoipa::path(post, path = "/api/documents/{uuid}/periodic-review", tag = "Workflow",
    params(("uuid" = Uuid, Path, description = "Document UUID"),),
    request_body = PeriodicReviewBody,
    responses((status = 200, body = DocumentViewResponse)))]
pub async fn complete_periodic_review(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(uuid): Path<Uuid>,
    Json(body): Json<PeriodicReviewBody>,
) -> Result<Json<DocumentViewResponse>, ApiError> {
    let client = ctx.edms_client();
    let events = ctx.ui_event_publisher();
    let uc = CompletePeriodicReview {
        client: client.as_ref(),
        events: events.as_ref(),
    };
    let req = PeriodicReviewRequest {
        outcome: body.outcome,
        comments: body.comments,
        next_review_months: body.next_review_months,
    };
    let view = uc.execute(&bearer.0, uuid, &req).await?;
    Ok(Json(view.into()))
}

#[utoipa::path(post, path = "/api/documents/{uuid}/terminate", tag = "Workflow",
    params(("uuid" = Uuid, Path, description = "Document UUID"),),
    request_body = TerminateBody,
    responses((status = 200, body = DocumentViewResponse), (status = 422, description = "Reason or confirmation missing")))]
pub async fn terminate_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(uuid): Path<Uuid>,
    Json(body): Json<TerminateBody>,
) -> Result<Json<DocumentViewResponse>, ApiError> {
    let client = ctx.edms_client();
    let events = ctx.ui_event_publisher();
    let uc = TerminateDocument {
        client: client.as_ref(),
        events: events.as_ref(),
    };
    let req = TerminateRequest {
        reason: body.reason,
        confirmation: body.confirmation,
    };
    let view = uc.execute(&bearer.0, uuid, &req).await?;
    Ok(Json(view.into()))
}
