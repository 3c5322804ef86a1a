use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use crm_core::models::client::Client;
use crm_core::repository::ClientRepository;
use crm_core::validation::ClientPayload;

use super::{parse_id, validated};
use crate::AppState;
use crate::error::ApiResult;
use crate::extract::AuthUser;

const ENTITY: &str = "client";

pub(crate) async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<Client>>> {
    Ok(Json(state.clients.list(user_id).await?))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<ClientPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let input = validated(body)?;
    let client = state.clients.create(user_id, input).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub(crate) async fn get(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Client>> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.clients.get_by_id(user_id, id).await?))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    body: Result<Json<ClientPayload>, JsonRejection>,
) -> ApiResult<Json<Client>> {
    let id = parse_id(&id, ENTITY)?;
    let input = validated(body)?;
    Ok(Json(state.clients.update(user_id, id, input).await?))
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, ENTITY)?;
    state.clients.delete(user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
