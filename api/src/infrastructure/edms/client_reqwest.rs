use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::application::dto::documents::{
    CreateDocumentForm, CreateVersionRequest, DocumentQuery, DownloadVariant, FetchedFile,
    MarkObsoleteRequest, PeriodicReviewSubmission, RouteForApprovalRequest, UpdateDocumentForm,
    UploadedFile,
};
use crate::application::ports::edms_client::{EdmsClient, EdmsClientError};
use crate::domain::documents::dependency::DependencyChain;
use crate::domain::documents::document::Document;
use crate::domain::users::user::User;
use crate::domain::workflow::instance::WorkflowInstance;
use crate::infrastructure::edms::wire;

/// `EdmsClient` over the EDMS REST API. Holds no credentials of its own;
/// every request carries the caller's bearer token.
#[derive(Clone)]
pub struct ReqwestEdmsClient {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestEdmsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn document_url(&self, uuid: Uuid, action: &str) -> String {
        if action.is_empty() {
            self.url(&format!("documents/documents/{uuid}/"))
        } else {
            self.url(&format!("documents/documents/{uuid}/{action}/"))
        }
    }

    async fn send(&self, req: RequestBuilder, token: &str) -> Result<Response, EdmsClientError> {
        let resp = req.bearer_auth(token).send().await.map_err(|e| {
            tracing::warn!(error = ?e, "edms_request_failed");
            EdmsClientError::Transport(e.to_string())
        })?;
        let status = resp.status().as_u16();
        if resp.status().is_success() {
            return Ok(resp);
        }
        let url = resp.url().path().to_string();
        let body: Value = resp
            .bytes()
            .await
            .ok()
            .and_then(|b| serde_json::from_slice(&b).ok())
            .unwrap_or(Value::Null);
        let message = wire::error_message(status, &body);
        tracing::debug!(status, path = %url, %message, "edms_request_rejected");
        Err(match status {
            401 => EdmsClientError::Unauthorized(message),
            403 => EdmsClientError::Forbidden(message),
            404 => EdmsClientError::NotFound,
            _ => EdmsClientError::Rejected { status, message },
        })
    }

    async fn send_json(&self, req: RequestBuilder, token: &str) -> Result<Value, EdmsClientError> {
        let resp = self.send(req, token).await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| EdmsClientError::Transport(e.to_string()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| EdmsClientError::Decode(e.to_string()))
    }

    async fn post_action(
        &self,
        token: &str,
        uuid: Uuid,
        action: &str,
        body: Value,
    ) -> Result<Value, EdmsClientError> {
        let req = self.client.post(self.document_url(uuid, action)).json(&body);
        self.send_json(req, token).await
    }
}

fn file_part(file: &UploadedFile) -> Part {
    let mime = file.content_type.clone().unwrap_or_else(|| {
        mime_guess::from_path(&file.file_name)
            .first_or_octet_stream()
            .to_string()
    });
    let part = || Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
    part().mime_str(&mime).unwrap_or_else(|_| part())
}

fn create_form(form: &CreateDocumentForm) -> Form {
    let mut multipart = Form::new()
        .text("title", form.title.trim().to_string())
        .text("description", form.description.trim().to_string());
    if let Some(kind) = &form.document_type {
        multipart = multipart.text("document_type", kind.clone());
    }
    if let Some(reviewer) = form.reviewer {
        multipart = multipart.text("reviewer", reviewer.to_string());
    }
    if let Some(approver) = form.approver {
        multipart = multipart.text("approver", approver.to_string());
    }
    if let Some(file) = &form.file {
        multipart = multipart.part("file", file_part(file));
    }
    multipart
}

fn update_form(form: &UpdateDocumentForm) -> Form {
    let mut multipart = Form::new();
    if let Some(title) = &form.title {
        multipart = multipart.text("title", title.trim().to_string());
    }
    if let Some(description) = &form.description {
        multipart = multipart.text("description", description.trim().to_string());
    }
    if let Some(reviewer) = form.reviewer {
        multipart = multipart.text("reviewer", reviewer.to_string());
    }
    if let Some(approver) = form.approver {
        multipart = multipart.text("approver", approver.to_string());
    }
    if let Some(file) = &form.file {
        multipart = multipart.part("file", file_part(file));
    }
    multipart
}

fn to_value<T: serde::Serialize>(body: &T) -> Result<Value, EdmsClientError> {
    serde_json::to_value(body).map_err(|e| EdmsClientError::Decode(e.to_string()))
}

#[async_trait]
impl EdmsClient for ReqwestEdmsClient {
    async fn ping(&self) -> Result<(), EdmsClientError> {
        // Any HTTP answer, including 401, means the API is up.
        self.client
            .get(self.url("auth/profile/"))
            .send()
            .await
            .map(|_| ())
            .map_err(|e| EdmsClientError::Transport(e.to_string()))
    }

    async fn current_user(&self, token: &str) -> Result<User, EdmsClientError> {
        let body = self
            .send_json(self.client.get(self.url("auth/profile/")), token)
            .await?;
        wire::decode(body, Some("user"))
    }

    async fn list_documents(
        &self,
        token: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, EdmsClientError> {
        let req = self
            .client
            .get(self.url("documents/documents/"))
            .query(&query.to_pairs());
        let body = self.send_json(req, token).await?;
        wire::decode(body, Some("documents"))
    }

    async fn get_document(&self, token: &str, uuid: Uuid) -> Result<Document, EdmsClientError> {
        let body = self
            .send_json(self.client.get(self.document_url(uuid, "")), token)
            .await?;
        wire::decode(body, Some("document"))
    }

    async fn create_document(
        &self,
        token: &str,
        form: &CreateDocumentForm,
    ) -> Result<Document, EdmsClientError> {
        let req = self
            .client
            .post(self.url("documents/documents/"))
            .multipart(create_form(form));
        let body = self.send_json(req, token).await?;
        wire::decode(body, Some("document"))
    }

    async fn update_document(
        &self,
        token: &str,
        uuid: Uuid,
        form: &UpdateDocumentForm,
    ) -> Result<Document, EdmsClientError> {
        let req = self
            .client
            .patch(self.document_url(uuid, ""))
            .multipart(update_form(form));
        let body = self.send_json(req, token).await?;
        wire::decode(body, Some("document"))
    }

    async fn dependency_chain(
        &self,
        token: &str,
        uuid: Uuid,
        max_depth: u32,
    ) -> Result<DependencyChain, EdmsClientError> {
        let req = self
            .client
            .get(self.document_url(uuid, "dependency_chain"))
            .query(&[("max_depth", max_depth)]);
        let body = self.send_json(req, token).await?;
        if body.is_null() {
            return Ok(DependencyChain::default());
        }
        wire::decode(body, Some("dependency_chain"))
    }

    async fn workflow_status(
        &self,
        token: &str,
        uuid: Uuid,
    ) -> Result<Option<WorkflowInstance>, EdmsClientError> {
        let req = self.client.get(self.document_url(uuid, "workflow_status"));
        let body = match self.send_json(req, token).await {
            Ok(body) => wire::unwrap_envelope(body, Some("workflow")),
            Err(EdmsClientError::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };
        match body {
            Value::Null => Ok(None),
            Value::Object(ref map) if map.is_empty() => Ok(None),
            body => wire::decode(body, None).map(Some),
        }
    }

    async fn submit_for_review(
        &self,
        token: &str,
        uuid: Uuid,
        comment: Option<&str>,
    ) -> Result<(), EdmsClientError> {
        let body = match comment {
            Some(c) => json!({ "comment": c }),
            None => json!({}),
        };
        self.post_action(token, uuid, "submit_for_review", body)
            .await
            .map(|_| ())
    }

    async fn route_for_approval(
        &self,
        token: &str,
        uuid: Uuid,
        req: &RouteForApprovalRequest,
    ) -> Result<(), EdmsClientError> {
        self.post_action(token, uuid, "route_for_approval", to_value(req)?)
            .await
            .map(|_| ())
    }

    async fn create_version(
        &self,
        token: &str,
        uuid: Uuid,
        req: &CreateVersionRequest,
    ) -> Result<Document, EdmsClientError> {
        let body = self
            .post_action(token, uuid, "create_version", to_value(req)?)
            .await?;
        wire::decode(body, Some("document"))
    }

    async fn mark_obsolete(
        &self,
        token: &str,
        uuid: Uuid,
        req: &MarkObsoleteRequest,
    ) -> Result<(), EdmsClientError> {
        self.post_action(token, uuid, "mark_obsolete", to_value(req)?)
            .await
            .map(|_| ())
    }

    async fn complete_periodic_review(
        &self,
        token: &str,
        uuid: Uuid,
        req: &PeriodicReviewSubmission,
    ) -> Result<(), EdmsClientError> {
        self.post_action(token, uuid, "complete_periodic_review", to_value(req)?)
            .await
            .map(|_| ())
    }

    async fn terminate(&self, token: &str, id: i64, reason: &str) -> Result<(), EdmsClientError> {
        let req = self
            .client
            .post(self.url(&format!("documents/documents/{id}/terminate/")))
            .json(&json!({ "reason": reason }));
        self.send_json(req, token).await.map(|_| ())
    }

    async fn download(
        &self,
        token: &str,
        id: i64,
        variant: DownloadVariant,
    ) -> Result<FetchedFile, EdmsClientError> {
        let path = format!("documents/{id}/download/{}/", variant.as_str());
        let resp = self.send(self.client.get(self.url(&path)), token).await?;
        let header = |name: reqwest::header::HeaderName| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let filename = header(reqwest::header::CONTENT_DISPOSITION)
            .as_deref()
            .and_then(wire::disposition_filename);
        let content_type = header(reqwest::header::CONTENT_TYPE);
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| EdmsClientError::Transport(e.to_string()))?;
        Ok(FetchedFile {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_joined_without_double_slashes() {
        let client = ReqwestEdmsClient::new("http://edms.local/api/v1/");
        let uuid = Uuid::nil();
        assert_eq!(
            client.url("/auth/profile/"),
            "http://edms.local/api/v1/auth/profile/"
        );
        assert_eq!(
            client.document_url(uuid, "workflow_status"),
            format!("http://edms.local/api/v1/documents/documents/{uuid}/workflow_status/")
        );
        assert_eq!(
            client.document_url(uuid, ""),
            format!("http://edms.local/api/v1/documents/documents/{uuid}/")
        );
    }
}
