use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use crm_core::models::reminder::{Reminder, due_window};
use crm_core::repository::ReminderRepository;
use crm_core::validation::ReminderPayload;

use super::{parse_id, validated};
use crate::AppState;
use crate::error::ApiResult;
use crate::extract::AuthUser;

const ENTITY: &str = "reminder";

pub(crate) async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<Reminder>>> {
    Ok(Json(state.reminders.list(user_id).await?))
}

/// Reminders due between now and seven days from now, soonest first.
pub(crate) async fn this_week(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<Reminder>>> {
    let (from, to) = due_window(Utc::now());
    Ok(Json(state.reminders.list_due_between(user_id, from, to).await?))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<ReminderPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Reminder>)> {
    let input = validated(body)?;
    let created = state.reminders.create(user_id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(crate) async fn get(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Reminder>> {
    let id = parse_id(&id, ENTITY)?;
    Ok(Json(state.reminders.get_by_id(user_id, id).await?))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    body: Result<Json<ReminderPayload>, JsonRejection>,
) -> ApiResult<Json<Reminder>> {
    let id = parse_id(&id, ENTITY)?;
    let input = validated(body)?;
    Ok(Json(state.reminders.update(user_id, id, input).await?))
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, ENTITY)?;
    state.reminders.delete(user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
