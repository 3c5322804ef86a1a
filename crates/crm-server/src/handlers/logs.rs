use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use crm_core::models::interaction_log::InteractionLog;
use crm_core::repository::InteractionLogRepository;
use crm_core::validation::InteractionLogPayload;

use super::{parse_id, validated};
use crate::AppState;
use crate::error::ApiResult;
use crate::extract::AuthUser;

const ENTITY: &str = "interaction_log";

pub(crate) async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<InteractionLog>>> {
    Ok(Json(state.logs.list(user_id).await?))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<InteractionLogPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<InteractionLog>)> {
    let input = validated(body)?;
    let created = state.logs.create(user_id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn get(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<InteractionLog>> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.logs.get_by_id(user_id, id).await?))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    body: Result<Json<InteractionLogPayload>, JsonRejection>,
) -> ApiResult<Json<InteractionLog>> {
    let id = parse_id(&id, ENTITY)?;
    let input = validated(body)?;
    Ok(Json(state.logs.update(user_id, id, input).await?))
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, ENTITY)?;
    state.logs.delete(user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
