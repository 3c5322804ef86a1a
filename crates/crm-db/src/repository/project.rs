//! SurrealDB implementation of [`ProjectRepository`].
//!
//! Projects carry no tenant stamp. Every statement resolves ownership
//! through `client_id` against the caller's clients, inside the same
//! statement that reads or mutates the row.

use chrono::{DateTime, Utc};
use crm_core::error::CrmResult;
use crm_core::models::project::{Project, ProjectInput, ProjectStatus};
use crm_core::repository::ProjectRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use super::{NOT_OWNED, OWNED_CLIENT_IDS, check_cascade, ensure_owned_client, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ProjectRow {
    client_id: String,
    title: String,
    description: Option<String>,
    budget: f64,
    deadline: DateTime<Utc>,
    status: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ProjectRowWithId {
    record_id: String,
    client_id: String,
    title: String,
    description: Option<String>,
    budget: f64,
    deadline: DateTime<Utc>,
    status: String,
    created_at: DateTime<Utc>,
}

fn row_to_project(row: ProjectRow, id: Uuid) -> Result<Project, DbError> {
    let status = row
        .status
        .parse::<ProjectStatus>()
        .map_err(|e| DbError::InvalidRow(e.to_string()))?;
    Ok(Project {
        id,
        client_id: parse_uuid("client", &row.client_id)?,
        title: row.title,
        description: row.description,
        budget: row.budget,
        deadline: row.deadline,
        status,
        created_at: row.created_at,
    })
}

impl ProjectRowWithId {
    fn try_into_project(self) -> Result<Project, DbError> {
        let id = parse_uuid("project", &self.record_id)?;
        row_to_project(
            ProjectRow {
                client_id: self.client_id,
                title: self.title,
                description: self.description,
                budget: self.budget,
                deadline: self.deadline,
                status: self.status,
                created_at: self.created_at,
            },
            id,
        )
    }
}

/// SurrealDB implementation of the Project repository.
#[derive(Clone)]
pub struct SurrealProjectRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProjectRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProjectRepository for SurrealProjectRepository<C> {
    async fn create(&self, user_id: Uuid, input: ProjectInput) -> CrmResult<Project> {
        ensure_owned_client(&self.db, user_id, input.client_id).await?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('project', $id) SET \
                 client_id = $client_id, \
                 title = $title, description = $description, \
                 budget = $budget, deadline = $deadline, \
                 status = $status",
            )
            .bind(("id", id_str.clone()))
            .bind(("client_id", input.client_id.to_string()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("budget", input.budget))
            .bind(("deadline", input.deadline))
            .bind(("status", input.status.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("project", &id_str))?;

        debug!(project_id = %id, client_id = %input.client_id, "Created project");
        row_to_project(row, id).map_err(Into::into)
    }

    async fn list(&self, user_id: Uuid) -> CrmResult<Vec<Project>> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM project \
             WHERE client_id IN {OWNED_CLIENT_IDS} \
             ORDER BY created_at DESC"
        );

        let mut result = self
            .db
            .query(query)
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRowWithId> = result.take(0).map_err(DbError::from)?;

        let projects = rows
            .into_iter()
            .map(|row| row.try_into_project())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(projects)
    }

    async fn get_by_id(&self, user_id: Uuid, id: Uuid) -> CrmResult<Project> {
        let id_str = id.to_string();
        let query = format!(
            "SELECT * FROM type::record('project', $id) \
             WHERE client_id IN {OWNED_CLIENT_IDS}"
        );

        let mut result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("project", &id_str))?;

        row_to_project(row, id).map_err(Into::into)
    }

    async fn update(&self, user_id: Uuid, id: Uuid, input: ProjectInput) -> CrmResult<Project> {
        let id_str = id.to_string();

        // Both the current and the requested client must be the
        // caller's; checked by the UPDATE itself.
        let query = format!(
            "UPDATE type::record('project', $id) SET \
             client_id = $client_id, \
             title = $title, description = $description, \
             budget = $budget, deadline = $deadline, \
             status = $status \
             WHERE client_id IN {OWNED_CLIENT_IDS} \
             AND $client_id IN {OWNED_CLIENT_IDS}"
        );

        let result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .bind(("client_id", input.client_id.to_string()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("budget", input.budget))
            .bind(("deadline", input.deadline))
            .bind(("status", input.status.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ProjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("project", &id_str))?;

        row_to_project(row, id).map_err(Into::into)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> CrmResult<()> {
        let id_str = id.to_string();

        // Logs that only hung off this project would become unreachable;
        // logs that also name a client keep that link.
        let response = self
            .db
            .query(format!(
                "BEGIN TRANSACTION; \
                 LET $gone = (DELETE type::record('project', $id) \
                     WHERE client_id IN {OWNED_CLIENT_IDS} RETURN BEFORE); \
                 IF array::len($gone) = 0 {{ THROW '{NOT_OWNED}' }}; \
                 DELETE interaction_log WHERE project_id = $id AND client_id = NONE; \
                 UPDATE interaction_log SET project_id = NONE WHERE project_id = $id; \
                 UPDATE reminder SET project_id = NONE \
                     WHERE user_id = $user_id AND project_id = $id; \
                 COMMIT TRANSACTION;"
            ))
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        check_cascade(response, "project", &id_str)?;

        debug!(project_id = %id, %user_id, "Deleted project");
        Ok(())
    }
}
