//! SurrealDB implementation of [`ClientRepository`].

use chrono::{DateTime, Utc};
use crm_core::error::CrmResult;
use crm_core::models::client::{Client, ClientInput};
use crm_core::repository::ClientRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use super::{NOT_OWNED, check_cascade, parse_uuid};
use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ClientRow {
    user_id: String,
    name: String,
    email: String,
    phone: String,
    company: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ClientRowWithId {
    record_id: String,
    user_id: String,
    name: String,
    email: String,
    phone: String,
    company: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl ClientRow {
    fn into_client(self, id: Uuid) -> Result<Client, DbError> {
        Ok(Client {
            id,
            user_id: parse_uuid("user", &self.user_id)?,
            name: self.name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

impl ClientRowWithId {
    fn try_into_client(self) -> Result<Client, DbError> {
        let id = parse_uuid("client", &self.record_id)?;
        ClientRow {
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            notes: self.notes,
            created_at: self.created_at,
        }
        .into_client(id)
    }
}

/// SurrealDB implementation of the Client repository.
#[derive(Clone)]
pub struct SurrealClientRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealClientRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ClientRepository for SurrealClientRepository<C> {
    async fn create(&self, user_id: Uuid, input: ClientInput) -> CrmResult<Client> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('client', $id) SET \
                 user_id = $user_id, \
                 name = $name, email = $email, phone = $phone, \
                 company = $company, notes = $notes",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("phone", input.phone))
            .bind(("company", input.company))
            .bind(("notes", input.notes))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ClientRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("client", &id_str))?;

        debug!(client_id = %id, %user_id, "Created client");
        row.into_client(id).map_err(Into::into)
    }

    async fn list(&self, user_id: Uuid) -> CrmResult<Vec<Client>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM client \
                 WHERE user_id = $user_id \
                 ORDER BY created_at DESC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ClientRowWithId> = result.take(0).map_err(DbError::from)?;

        let clients = rows
            .into_iter()
            .map(|row| row.try_into_client())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(clients)
    }

    async fn get_by_id(&self, user_id: Uuid, id: Uuid) -> CrmResult<Client> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('client', $id) \
                 WHERE user_id = $user_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ClientRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("client", &id_str))?;

        row.into_client(id).map_err(Into::into)
    }

    async fn update(&self, user_id: Uuid, id: Uuid, input: ClientInput) -> CrmResult<Client> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('client', $id) SET \
                 name = $name, email = $email, phone = $phone, \
                 company = $company, notes = $notes \
                 WHERE user_id = $user_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("phone", input.phone))
            .bind(("company", input.company))
            .bind(("notes", input.notes))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ClientRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("client", &id_str))?;

        row.into_client(id).map_err(Into::into)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> CrmResult<()> {
        let id_str = id.to_string();

        // Projects and logs go with the client. Reminders keep their own
        // tenancy; only the caller's are detached.
        let response = self
            .db
            .query(format!(
                "BEGIN TRANSACTION; \
                 LET $gone = (DELETE type::record('client', $id) \
                     WHERE user_id = $user_id RETURN BEFORE); \
                 IF array::len($gone) = 0 {{ THROW '{NOT_OWNED}' }}; \
                 LET $project_ids = (SELECT VALUE meta::id(id) FROM project \
                     WHERE client_id = $id); \
                 DELETE interaction_log WHERE client_id = $id \
                     OR project_id IN $project_ids; \
                 UPDATE reminder SET project_id = NONE \
                     WHERE user_id = $user_id AND project_id IN $project_ids; \
                 UPDATE reminder SET client_id = NONE \
                     WHERE user_id = $user_id AND client_id = $id; \
                 DELETE project WHERE client_id = $id; \
                 COMMIT TRANSACTION;"
            ))
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        check_cascade(response, "client", &id_str)?;

        debug!(client_id = %id, %user_id, "Deleted client and dependents");
        Ok(())
    }
}
