use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State, multipart::MultipartError},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::dependency_graph::DependencyGraph;
use crate::application::dto::documents::{
    CreateDocumentForm, DocumentQuery, DownloadVariant, UpdateDocumentForm, UploadedFile,
};
use crate::application::use_cases::documents::create_document::CreateDocument;
use crate::application::use_cases::documents::download_document::DownloadDocument;
use crate::application::use_cases::documents::get_dependency_graph::GetDependencyGraph;
use crate::application::use_cases::documents::get_document_view::{DocumentView, GetDocumentView};
use crate::application::use_cases::documents::list_documents::ListDocuments;
use crate::application::use_cases::documents::list_version_groups::ListVersionGroups;
use crate::application::use_cases::documents::update_document::UpdateDocument;
use crate::application::use_cases::error::UseCaseError;
use crate::application::validation::ValidationErrors;
use crate::application::versions::VersionGroup;
use crate::application::workflow::{DocumentGates, RoleFlags, WorkflowAction};
use crate::bootstrap::app_context::AppContext;
use crate::domain::documents::document::Document;
use crate::domain::users::user::User;
use crate::domain::workflow::instance::WorkflowInstance;
use crate::presentation::http::auth::Bearer;
use crate::presentation::http::error::ApiError;

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/documents", get(list_documents).post(create_document))
        .route("/documents/versions", get(list_version_groups))
        .route(
            "/documents/:uuid",
            get(get_document).patch(update_document),
        )
        .route("/documents/:uuid/actions", get(get_document_actions))
        .route(
            "/documents/:uuid/dependency-graph",
            get(get_dependency_graph),
        )
        .route(
            "/documents/:uuid/download/:variant",
            get(download_document),
        )
        .with_state(ctx)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentListResponse {
    #[schema(value_type = Vec<Object>)]
    pub items: Vec<Document>,
}

/// A document with the caller's relation to it and the workflow actions
/// they are offered.
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentViewResponse {
    #[schema(value_type = Object)]
    pub document: Document,
    #[schema(value_type = Object)]
    pub user: User,
    #[schema(value_type = Option<Object>)]
    pub workflow: Option<WorkflowInstance>,
    #[schema(value_type = Object)]
    pub flags: RoleFlags,
    #[schema(value_type = Object)]
    pub gates: DocumentGates,
    #[schema(value_type = Vec<Object>)]
    pub actions: Vec<WorkflowAction>,
    /// The change went through but the document could not be re-read.
    pub stale: bool,
}

impl From<DocumentView> for DocumentViewResponse {
    fn from(view: DocumentView) -> Self {
        Self {
            document: view.document,
            user: view.user,
            workflow: view.workflow,
            flags: view.flags,
            gates: view.gates,
            actions: view.actions,
            stale: view.stale,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentActionsResponse {
    pub document_uuid: Uuid,
    #[schema(value_type = Object)]
    pub flags: RoleFlags,
    #[schema(value_type = Object)]
    pub gates: DocumentGates,
    #[schema(value_type = Vec<Object>)]
    pub actions: Vec<WorkflowAction>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VersionGroupsResponse {
    #[schema(value_type = Vec<Object>)]
    pub groups: Vec<VersionGroup>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DependencyGraphResponse {
    #[schema(value_type = Vec<Object>)]
    pub nodes: Vec<crate::application::dependency_graph::GraphNode>,
    #[schema(value_type = Vec<Object>)]
    pub edges: Vec<crate::application::dependency_graph::GraphEdge>,
    pub has_max_depth_nodes: bool,
    pub max_depth: u32,
    pub warning: Option<String>,
}

impl From<DependencyGraph> for DependencyGraphResponse {
    fn from(graph: DependencyGraph) -> Self {
        let warning = graph.warning().map(str::to_string);
        Self {
            nodes: graph.nodes,
            edges: graph.edges,
            has_max_depth_nodes: graph.has_max_depth_nodes,
            max_depth: graph.max_depth,
            warning,
        }
    }
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct DocumentFormMultipart {
    #[schema(value_type = Option<String>)]
    title: String,
    #[schema(value_type = Option<String>)]
    description: String,
    #[schema(value_type = Option<String>)]
    document_type: String,
    /// Reviewer user id
    #[schema(value_type = Option<i64>)]
    reviewer: i64,
    /// Approver user id
    #[schema(value_type = Option<i64>)]
    approver: i64,
    #[schema(value_type = Option<String>, format = Binary)]
    file: String,
}

#[allow(dead_code)]
#[derive(ToSchema)]
pub struct DocumentFileBinary(#[schema(value_type = String, format = Binary)] Vec<u8>);

#[utoipa::path(get, path = "/api/documents", tag = "Documents",
    params(
        ("status" = Option<String>, Query, description = "Lifecycle status, e.g. EFFECTIVE"),
        ("filter" = Option<String>, Query, description = "my_tasks | pending_my_action | periodic_review"),
        ("mine" = Option<bool>, Query, description = "Only documents authored by the caller"),
        ("search" = Option<String>, Query, description = "Free-text search"),
    ),
    responses((status = 200, body = DocumentListResponse)))]
pub async fn list_documents(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Query(query): Query<DocumentQuery>,
) -> Result<Json<DocumentListResponse>, ApiError> {
    let client = ctx.edms_client();
    let uc = ListDocuments {
        client: client.as_ref(),
    };
    let items = uc.execute(&bearer.0, &query).await?;
    Ok(Json(DocumentListResponse { items }))
}

#[utoipa::path(get, path = "/api/documents/versions", tag = "Documents",
    params(
        ("status" = Option<String>, Query, description = "Lifecycle status"),
        ("search" = Option<String>, Query, description = "Free-text search"),
    ),
    responses((status = 200, body = VersionGroupsResponse)))]
pub async fn list_version_groups(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Query(query): Query<DocumentQuery>,
) -> Result<Json<VersionGroupsResponse>, ApiError> {
    let client = ctx.edms_client();
    let uc = ListVersionGroups {
        client: client.as_ref(),
    };
    let groups = uc.execute(&bearer.0, &query).await?;
    Ok(Json(VersionGroupsResponse { groups }))
}

#[utoipa::path(get, path = "/api/documents/{uuid}", tag = "Documents",
    params(("uuid" = Uuid, Path, description = "Document UUID"),),
    responses((status = 200, body = DocumentViewResponse), (status = 404, description = "Document not found")))]
pub async fn get_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(uuid): Path<Uuid>,
) -> Result<Json<DocumentViewResponse>, ApiError> {
    let client = ctx.edms_client();
    let uc = GetDocumentView {
        client: client.as_ref(),
    };
    let view = uc.execute(&bearer.0, uuid, Utc::now()).await?;
    Ok(Json(view.into()))
}

#[utoipa::path(get, path = "/api/documents/{uuid}/actions", tag = "Workflow",
    params(("uuid" = Uuid, Path, description = "Document UUID"),),
    responses((status = 200, body = DocumentActionsResponse)))]
pub async fn get_document_actions(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(uuid): Path<Uuid>,
) -> Result<Json<DocumentActionsResponse>, ApiError> {
    let client = ctx.edms_client();
    let uc = GetDocumentView {
        client: client.as_ref(),
    };
    let view = uc.execute(&bearer.0, uuid, Utc::now()).await?;
    Ok(Json(DocumentActionsResponse {
        document_uuid: view.document.uuid,
        flags: view.flags,
        gates: view.gates,
        actions: view.actions,
    }))
}

#[utoipa::path(get, path = "/api/documents/{uuid}/dependency-graph", tag = "Documents",
    params(("uuid" = Uuid, Path, description = "Document UUID"),),
    responses((status = 200, body = DependencyGraphResponse)))]
pub async fn get_dependency_graph(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(uuid): Path<Uuid>,
) -> Result<Json<DependencyGraphResponse>, ApiError> {
    let client = ctx.edms_client();
    let uc = GetDependencyGraph {
        client: client.as_ref(),
    };
    let graph = uc.execute(&bearer.0, uuid).await?;
    Ok(Json(graph.into()))
}

/// Fields of a create/update multipart body, before they are typed.
#[derive(Default)]
struct RawDocumentForm {
    text: HashMap<String, String>,
    file: Option<UploadedFile>,
}

impl RawDocumentForm {
    fn text(&self, name: &str) -> Option<String> {
        self.text.get(name).cloned()
    }

    fn user_id(&self, name: &'static str, errors: &mut ValidationErrors) -> Option<i64> {
        let value = self.text.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())?;
        match value.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add(name, "Select a user from the list");
                None
            }
        }
    }

    /// Reviewer and approver ids; malformed ones are reported per field.
    fn assignees(&self) -> Result<(Option<i64>, Option<i64>), ApiError> {
        let mut errors = ValidationErrors::default();
        let reviewer = self.user_id("reviewer", &mut errors);
        let approver = self.user_id("approver", &mut errors);
        if errors.is_empty() {
            Ok((reviewer, approver))
        } else {
            Err(UseCaseError::Validation(errors).into())
        }
    }
}

// Keeps the extractor's status, so a tripped body limit stays a 413.
fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::new(err.status(), err.body_text())
}

async fn read_document_form(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<RawDocumentForm, ApiError> {
    let mut form = RawDocumentForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let name = field.name().map(|s| s.to_string()).unwrap_or_default();
        if name == "file" {
            let file_name = field.file_name().map(|s| s.to_string());
            let content_type = field.content_type().map(|s| s.to_string());
            let data = field
                .bytes()
                .await
                .map_err(multipart_error)?;
            if data.len() > max_bytes {
                return Err(StatusCode::PAYLOAD_TOO_LARGE.into());
            }
            if data.is_empty() && file_name.is_none() {
                continue;
            }
            form.file = Some(UploadedFile {
                file_name: file_name.unwrap_or_else(|| "upload.bin".into()),
                content_type,
                bytes: data.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(multipart_error)?;
            form.text.insert(name, value);
        }
    }
    Ok(form)
}

#[utoipa::path(post, path = "/api/documents", tag = "Documents",
    request_body(content = DocumentFormMultipart, content_type = "multipart/form-data"),
    responses((status = 201, body = DocumentViewResponse), (status = 422, description = "Invalid form")))]
pub async fn create_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentViewResponse>), ApiError> {
    let raw = read_document_form(multipart, ctx.cfg.upload_max_bytes).await?;
    let (reviewer, approver) = raw.assignees()?;
    let form = CreateDocumentForm {
        title: raw.text("title").unwrap_or_default(),
        description: raw.text("description").unwrap_or_default(),
        document_type: raw.text("document_type").filter(|t| !t.trim().is_empty()),
        reviewer,
        approver,
        file: raw.file,
    };
    let client = ctx.edms_client();
    let events = ctx.ui_event_publisher();
    let uc = CreateDocument {
        client: client.as_ref(),
        events: events.as_ref(),
    };
    let view = uc.execute(&bearer.0, &form).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

#[utoipa::path(patch, path = "/api/documents/{uuid}", tag = "Documents",
    params(("uuid" = Uuid, Path, description = "Document UUID"),),
    request_body(content = DocumentFormMultipart, content_type = "multipart/form-data"),
    responses((status = 200, body = DocumentViewResponse), (status = 409, description = "Document is not editable")))]
pub async fn update_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(uuid): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<DocumentViewResponse>, ApiError> {
    let raw = read_document_form(multipart, ctx.cfg.upload_max_bytes).await?;
    let (reviewer, approver) = raw.assignees()?;
    let form = UpdateDocumentForm {
        title: raw.text("title"),
        description: raw.text("description"),
        reviewer,
        approver,
        file: raw.file,
    };
    let client = ctx.edms_client();
    let events = ctx.ui_event_publisher();
    let uc = UpdateDocument {
        client: client.as_ref(),
        events: events.as_ref(),
    };
    let view = uc.execute(&bearer.0, uuid, &form).await?;
    Ok(Json(view.into()))
}

#[utoipa::path(get, path = "/api/documents/{uuid}/download/{variant}", tag = "Documents",
    operation_id = "download_document",
    params(
        ("uuid" = Uuid, Path, description = "Document UUID"),
        ("variant" = String, Path, description = "original | annotated | official"),
    ),
    responses(
        (status = 200, description = "Document file", body = DocumentFileBinary, content_type = "application/octet-stream"),
        (status = 404, description = "Document or file not found")
    ))]
pub async fn download_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path((uuid, variant)): Path<(Uuid, DownloadVariant)>,
) -> Result<Response, ApiError> {
    let client = ctx.edms_client();
    let uc = DownloadDocument {
        client: client.as_ref(),
    };
    let download = uc.execute(&bearer.0, uuid, variant).await?;

    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(&download.content_type)
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));
    headers.insert(axum::http::header::CONTENT_TYPE, content_type);
    headers.insert(
        axum::http::header::HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
    let disposition = HeaderValue::from_str(&content_disposition(&download.filename))
        .map_err(|_| ApiError::from(StatusCode::INTERNAL_SERVER_ERROR))?;
    headers.insert(axum::http::header::CONTENT_DISPOSITION, disposition);

    Ok((headers, download.bytes).into_response())
}

/// `attachment` disposition with an ASCII fallback name and the exact
/// name in RFC 5987 form.
fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(filename)
    )
}
