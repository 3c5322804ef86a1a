use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use crm_core::models::project::Project;
use crm_core::repository::ProjectRepository;
use crm_core::validation::ProjectPayload;

use super::{parse_id, validated};
use crate::AppState;
use crate::error::ApiResult;
use crate::extract::AuthUser;

const ENTITY: &str = "project";

pub(crate) async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.projects.list(user_id).await?))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<ProjectPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let input = validated(body)?;
    let created = state.projects.create(user_id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn get(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.projects.get_by_id(user_id, id).await?))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    body: Result<Json<ProjectPayload>, JsonRejection>,
) -> ApiResult<Json<Project>> {
    let id = parse_id(&id, ENTITY)?;
    let input = validated(body)?;
    Ok(Json(state.projects.update(user_id, id, input).await?))
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, ENTITY)?;
    state.projects.delete(user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
