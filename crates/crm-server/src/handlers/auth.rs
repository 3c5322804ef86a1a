use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use crm_core::validation::CredentialsPayload;
use serde_json::{Value, json};

use super::validated;
use crate::AppState;
use crate::error::ApiResult;

pub(crate) async fn sign_up(
    State(state): State<AppState>,
    body: Result<Json<CredentialsPayload>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let credentials = validated(body)?;
    let account = state.auth.sign_up(credentials).await?;
    Ok(Json(json!({
        "message": "Signup successful.",
        "user": account,
    })))
}

pub(crate) async fn login(
    State(state): State<AppState>,
    body: Result<Json<CredentialsPayload>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let credentials = validated(body)?;
    let output = state.auth.login(credentials).await?;
    Ok(Json(json!({
        "message": "Login successful",
        "session": output.session,
        "user": output.account,
    })))
}
