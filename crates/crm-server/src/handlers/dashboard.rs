use axum::Json;
use axum::extract::State;
use chrono::Utc;
use crm_core::models::dashboard::DashboardSummary;
use crm_core::repository::DashboardRepository;

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::AuthUser;

pub(crate) async fn summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<DashboardSummary>> {
    Ok(Json(state.dashboard.summary_at(user_id, Utc::now()).await?))
}
