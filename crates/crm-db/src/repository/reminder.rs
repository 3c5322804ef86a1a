//! SurrealDB implementation of [`ReminderRepository`].

use chrono::{DateTime, Utc};
use crm_core::error::CrmResult;
use crm_core::models::reminder::{Reminder, ReminderInput};
use crm_core::repository::ReminderRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use super::{parse_optional_uuid, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ReminderRow {
    user_id: String,
    client_id: Option<String>,
    project_id: Option<String>,
    note: String,
    due_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ReminderRowWithId {
    record_id: String,
    user_id: String,
    client_id: Option<String>,
    project_id: Option<String>,
    note: String,
    due_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl ReminderRow {
    fn into_reminder(self, id: Uuid) -> Result<Reminder, DbError> {
        Ok(Reminder {
            id,
            user_id: parse_uuid("user", &self.user_id)?,
            client_id: parse_optional_uuid("client", self.client_id)?,
            project_id: parse_optional_uuid("project", self.project_id)?,
            note: self.note,
            due_date: self.due_date,
            created_at: self.created_at,
        })
    }
}

impl ReminderRowWithId {
    fn try_into_reminder(self) -> Result<Reminder, DbError> {
        let id = parse_uuid("reminder", &self.record_id)?;
        ReminderRow {
            user_id: self.user_id,
            client_id: self.client_id,
            project_id: self.project_id,
            note: self.note,
            due_date: self.due_date,
            created_at: self.created_at,
        }
        .into_reminder(id)
    }
}

fn collect_reminders(rows: Vec<ReminderRowWithId>) -> Result<Vec<Reminder>, DbError> {
    rows.into_iter().map(|row| row.try_into_reminder()).collect()
}

/// SurrealDB implementation of the Reminder repository.
#[derive(Clone)]
pub struct SurrealReminderRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealReminderRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ReminderRepository for SurrealReminderRepository<C> {
    async fn create(&self, user_id: Uuid, input: ReminderInput) -> CrmResult<Reminder> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('reminder', $id) SET \
                 user_id = $user_id, \
                 client_id = $client_id, project_id = $project_id, \
                 note = $note, due_date = $due_date",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .bind(("client_id", input.client_id.map(|c| c.to_string())))
            .bind(("project_id", input.project_id.map(|p| p.to_string())))
            .bind(("note", input.note))
            .bind(("due_date", input.due_date))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ReminderRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("reminder", &id_str))?;

        debug!(reminder_id = %id, %user_id, "Created reminder");
        row.into_reminder(id).map_err(Into::into)
    }

    async fn list(&self, user_id: Uuid) -> CrmResult<Vec<Reminder>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM reminder \
                 WHERE user_id = $user_id \
                 ORDER BY due_date ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ReminderRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(collect_reminders(rows)?)
    }

    async fn list_due_between(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> CrmResult<Vec<Reminder>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM reminder \
                 WHERE user_id = $user_id \
                 AND due_date >= $from AND due_date <= $to \
                 ORDER BY due_date ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("from", from))
            .bind(("to", to))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ReminderRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(collect_reminders(rows)?)
    }

    async fn get_by_id(&self, user_id: Uuid, id: Uuid) -> CrmResult<Reminder> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('reminder', $id) \
                 WHERE user_id = $user_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ReminderRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("reminder", &id_str))?;

        row.into_reminder(id).map_err(Into::into)
    }

    async fn update(&self, user_id: Uuid, id: Uuid, input: ReminderInput) -> CrmResult<Reminder> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('reminder', $id) SET \
                 client_id = $client_id, project_id = $project_id, \
                 note = $note, due_date = $due_date \
                 WHERE user_id = $user_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .bind(("client_id", input.client_id.map(|c| c.to_string())))
            .bind(("project_id", input.project_id.map(|p| p.to_string())))
            .bind(("note", input.note))
            .bind(("due_date", input.due_date))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ReminderRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("reminder", &id_str))?;

        row.into_reminder(id).map_err(Into::into)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> CrmResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "DELETE type::record('reminder', $id) \
                 WHERE user_id = $user_id RETURN BEFORE",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let deleted: Vec<ReminderRow> = result.take(0).map_err(DbError::from)?;
        if deleted.is_empty() {
            return Err(DbError::not_found("reminder", &id_str).into());
        }

        Ok(())
    }
}
