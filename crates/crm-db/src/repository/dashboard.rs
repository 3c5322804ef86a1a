//! SurrealDB implementation of [`DashboardRepository`].

use chrono::{DateTime, Utc};
use crm_core::error::CrmResult;
use crm_core::models::dashboard::{DashboardSummary, ProjectsByStatus};
use crm_core::models::reminder::due_window;
use crm_core::repository::DashboardRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use super::{CountRow, OWNED_CLIENT_IDS};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct StatusCountRow {
    status: String,
    total: u64,
}

fn first_count(rows: Vec<CountRow>) -> u64 {
    rows.first().map(|r| r.total).unwrap_or(0)
}

/// SurrealDB implementation of the Dashboard repository.
#[derive(Clone)]
pub struct SurrealDashboardRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealDashboardRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> DashboardRepository for SurrealDashboardRepository<C> {
    async fn summary_at(&self, user_id: Uuid, now: DateTime<Utc>) -> CrmResult<DashboardSummary> {
        let (from, to) = due_window(now);

        // One round trip; any failing statement fails the whole summary.
        let query = format!(
            "SELECT count() AS total FROM client \
                 WHERE user_id = $user_id GROUP ALL; \
             SELECT count() AS total FROM project \
                 WHERE client_id IN {OWNED_CLIENT_IDS} GROUP ALL; \
             SELECT count() AS total FROM reminder \
                 WHERE user_id = $user_id \
                 AND due_date >= $from AND due_date <= $to GROUP ALL; \
             SELECT status, count() AS total FROM project \
                 WHERE client_id IN {OWNED_CLIENT_IDS} GROUP BY status;"
        );

        let result = self
            .db
            .query(query)
            .bind(("user_id", user_id.to_string()))
            .bind(("from", from))
            .bind(("to", to))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let clients: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let projects: Vec<CountRow> = result.take(1).map_err(DbError::from)?;
        let reminders: Vec<CountRow> = result.take(2).map_err(DbError::from)?;
        let by_status: Vec<StatusCountRow> = result.take(3).map_err(DbError::from)?;

        let summary = DashboardSummary {
            total_clients: first_count(clients),
            total_projects: first_count(projects),
            reminders_due: first_count(reminders),
            projects_by_status: ProjectsByStatus::tally(
                by_status.iter().map(|row| (row.status.as_str(), row.total)),
            ),
        };

        debug!(
            %user_id,
            total_clients = summary.total_clients,
            total_projects = summary.total_projects,
            reminders_due = summary.reminders_due,
            "Computed dashboard summary"
        );
        Ok(summary)
    }
}
