//! SurrealDB implementation of [`InteractionLogRepository`].
//!
//! A log belongs to a tenant when its client, or its project's client,
//! belongs to that tenant. Every operation, including update and
//! delete, is filtered by that rule.

use chrono::{DateTime, Utc};
use crm_core::error::CrmResult;
use crm_core::models::interaction_log::{InteractionLog, InteractionLogInput, InteractionType};
use crm_core::repository::InteractionLogRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use super::{
    OWNED_CLIENT_IDS, OWNED_PROJECT_IDS, ensure_owned_client, ensure_owned_project,
    parse_optional_uuid, parse_uuid,
};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct LogRow {
    client_id: Option<String>,
    project_id: Option<String>,
    date: DateTime<Utc>,
    kind: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct LogRowWithId {
    record_id: String,
    client_id: Option<String>,
    project_id: Option<String>,
    date: DateTime<Utc>,
    kind: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl LogRow {
    fn into_log(self, id: Uuid) -> Result<InteractionLog, DbError> {
        let kind = self
            .kind
            .parse::<InteractionType>()
            .map_err(DbError::InvalidRow)?;
        Ok(InteractionLog {
            id,
            client_id: parse_optional_uuid("client", self.client_id)?,
            project_id: parse_optional_uuid("project", self.project_id)?,
            date: self.date,
            kind,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

impl LogRowWithId {
    fn try_into_log(self) -> Result<InteractionLog, DbError> {
        let id = parse_uuid("interaction log", &self.record_id)?;
        LogRow {
            client_id: self.client_id,
            project_id: self.project_id,
            date: self.date,
            kind: self.kind,
            notes: self.notes,
            created_at: self.created_at,
        }
        .into_log(id)
    }
}

/// `WHERE` fragment selecting logs visible to `$user_id`.
fn visible_to_tenant() -> String {
    format!("(client_id IN {OWNED_CLIENT_IDS} OR project_id IN {OWNED_PROJECT_IDS})")
}

/// SurrealDB implementation of the InteractionLog repository.
#[derive(Clone)]
pub struct SurrealInteractionLogRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealInteractionLogRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> InteractionLogRepository for SurrealInteractionLogRepository<C> {
    async fn create(&self, user_id: Uuid, input: InteractionLogInput) -> CrmResult<InteractionLog> {
        if let Some(client_id) = input.client_id {
            ensure_owned_client(&self.db, user_id, client_id).await?;
        }
        if let Some(project_id) = input.project_id {
            ensure_owned_project(&self.db, user_id, project_id).await?;
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('interaction_log', $id) SET \
                 client_id = $client_id, project_id = $project_id, \
                 date = $date, kind = $kind, notes = $notes",
            )
            .bind(("id", id_str.clone()))
            .bind(("client_id", input.client_id.map(|c| c.to_string())))
            .bind(("project_id", input.project_id.map(|p| p.to_string())))
            .bind(("date", input.date))
            .bind(("kind", input.kind.as_str()))
            .bind(("notes", input.notes))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<LogRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("interaction_log", &id_str))?;

        debug!(log_id = %id, %user_id, "Created interaction log");
        row.into_log(id).map_err(Into::into)
    }

    async fn list(&self, user_id: Uuid) -> CrmResult<Vec<InteractionLog>> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM interaction_log \
             WHERE {} \
             ORDER BY created_at DESC",
            visible_to_tenant()
        );

        let mut result = self
            .db
            .query(query)
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LogRowWithId> = result.take(0).map_err(DbError::from)?;

        let logs = rows
            .into_iter()
            .map(|row| row.try_into_log())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(logs)
    }

    async fn get_by_id(&self, user_id: Uuid, id: Uuid) -> CrmResult<InteractionLog> {
        let id_str = id.to_string();
        let query = format!(
            "SELECT * FROM type::record('interaction_log', $id) WHERE {}",
            visible_to_tenant()
        );

        let mut result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LogRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("interaction_log", &id_str))?;

        row.into_log(id).map_err(Into::into)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: InteractionLogInput,
    ) -> CrmResult<InteractionLog> {
        let id_str = id.to_string();

        // The log must be visible to the caller now, and any new link
        // must point at the caller's own records.
        let mut conditions = vec![visible_to_tenant()];
        if input.client_id.is_some() {
            conditions.push(format!("$client_id IN {OWNED_CLIENT_IDS}"));
        }
        if input.project_id.is_some() {
            conditions.push(format!("$project_id IN {OWNED_PROJECT_IDS}"));
        }

        let query = format!(
            "UPDATE type::record('interaction_log', $id) SET \
             client_id = $client_id, project_id = $project_id, \
             date = $date, kind = $kind, notes = $notes \
             WHERE {}",
            conditions.join(" AND ")
        );

        let result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .bind(("client_id", input.client_id.map(|c| c.to_string())))
            .bind(("project_id", input.project_id.map(|p| p.to_string())))
            .bind(("date", input.date))
            .bind(("kind", input.kind.as_str()))
            .bind(("notes", input.notes))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<LogRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("interaction_log", &id_str))?;

        row.into_log(id).map_err(Into::into)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> CrmResult<()> {
        let id_str = id.to_string();
        let query = format!(
            "DELETE type::record('interaction_log', $id) WHERE {} RETURN BEFORE",
            visible_to_tenant()
        );

        let mut result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let deleted: Vec<LogRow> = result.take(0).map_err(DbError::from)?;
        if deleted.is_empty() {
            return Err(DbError::not_found("interaction_log", &id_str).into());
        }

        Ok(())
    }
}
