use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::{StatusCode, request::Parts},
    routing::get,
};

use serde::Serialize;
use utoipa::ToSchema;

use crate::application::use_cases::auth::me::GetMe;
use crate::bootstrap::app_context::AppContext;
use crate::domain::users::user::User;
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    /// Permission levels held through any role.
    pub permission_levels: Vec<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let mut permission_levels: Vec<String> = user
            .roles
            .iter()
            .map(|r| r.permission_level.as_str().to_string())
            .collect();
        permission_levels.sort();
        permission_levels.dedup();
        Self {
            id: user.id.0,
            display_name: user.display_name(),
            username: user.username,
            email: user.email,
            permission_levels,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new().route("/me", get(me)).with_state(ctx)
}

#[utoipa::path(get, path = "/api/me", tag = "Auth", responses(
    (status = 200, body = UserResponse),
    (status = 401, description = "Missing or rejected token")
))]
pub async fn me(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<Json<UserResponse>, ApiError> {
    let client = ctx.edms_client();
    let uc = GetMe {
        client: client.as_ref(),
    };
    let user = uc.execute(&bearer.0).await?;
    Ok(Json(UserResponse::from(user)))
}

/// The caller's EDMS access token. Forwarded untouched; the EDMS API is
/// the one that validates it.
pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(t) = auth.strip_prefix("Bearer ").map(str::trim) {
                if !t.is_empty() {
                    return Ok(Bearer(t.to_string()));
                }
            }
        }

        if let Some(cookie_hdr) = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(token) = get_cookie(cookie_hdr, "access_token") {
                return Ok(Bearer(token));
            }
        }

        Err(StatusCode::UNAUTHORIZED)
    }
}

fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some((k, v)) = kv.split_once('=') {
            if k.trim() == name && !v.trim().is_empty() {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}
