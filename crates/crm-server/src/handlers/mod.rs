//! Route handlers, one module per resource.

pub(crate) mod auth;
pub(crate) mod clients;
pub(crate) mod dashboard;
pub(crate) mod health;
pub(crate) mod logs;
pub(crate) mod projects;
pub(crate) mod reminders;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use crm_core::error::CrmError;
use crm_core::validation::IntoValidated;
use uuid::Uuid;

use crate::error::ApiResult;

/// A path id that is not a UUID cannot name any record.
pub(crate) fn parse_id(raw: &str, entity: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| CrmError::not_found(entity, raw).into())
}

/// Unwrap a JSON body and run it through its validator.
pub(crate) fn validated<P: IntoValidated>(
    body: Result<Json<P>, JsonRejection>,
) -> ApiResult<P::Output> {
    let Json(payload) = body?;
    Ok(payload.into_validated()?)
}
