//! Reminder domain model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the "due soon" window used by the dashboard and the
/// this-week listing.
pub const DUE_WINDOW_DAYS: i64 = 7;

/// Inclusive `[now, now + 7 days]` window.
pub fn due_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (now, now + Duration::days(DUE_WINDOW_DAYS))
}

/// A dated note owned directly by a tenant. The optional client and
/// project links are informational and are not ownership-checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub note: String,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderInput {
    pub client_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub note: String,
    pub due_date: DateTime<Utc>,
}
