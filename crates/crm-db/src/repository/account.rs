//! SurrealDB implementation of [`AccountRepository`].

use chrono::{DateTime, Utc};
use crm_core::error::CrmResult;
use crm_core::models::account::{Account, CreateAccount};
use crm_core::repository::AccountRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use super::{CountRow, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AccountRow {
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AccountRowWithId {
    record_id: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self, id: Uuid) -> Account {
        Account {
            id,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
    }
}

impl AccountRowWithId {
    fn try_into_account(self) -> Result<Account, DbError> {
        let id = parse_uuid("account", &self.record_id)?;
        Ok(Account {
            id,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Account repository.
#[derive(Clone)]
pub struct SurrealAccountRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAccountRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AccountRepository for SurrealAccountRepository<C> {
    async fn create(&self, input: CreateAccount) -> CrmResult<Account> {
        let mut existing = self
            .db
            .query("SELECT count() AS total FROM account WHERE email = $email GROUP ALL")
            .bind(("email", input.email.clone()))
            .await
            .map_err(DbError::from)?;
        let counts: Vec<CountRow> = existing.take(0).map_err(DbError::from)?;
        if counts.first().map(|r| r.total).unwrap_or(0) > 0 {
            return Err(DbError::AlreadyExists {
                entity: "account".into(),
            }
            .into());
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('account', $id) SET \
                 email = $email, password_hash = $password_hash",
            )
            .bind(("id", id_str.clone()))
            .bind(("email", input.email))
            .bind(("password_hash", input.password_hash))
            .await
            .map_err(DbError::from)?;

        // A concurrent sign-up that slips past the count trips the
        // unique index instead.
        let mut result = result.check().map_err(|e| {
            if e.to_string().contains("already contains") {
                DbError::AlreadyExists {
                    entity: "account".into(),
                }
            } else {
                DbError::from(e)
            }
        })?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("account", &id_str))?;

        debug!(account_id = %id, "Created account");
        Ok(row.into_account(id))
    }

    async fn get_by_id(&self, id: Uuid) -> CrmResult<Account> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('account', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("account", &id_str))?;

        Ok(row.into_account(id))
    }

    async fn get_by_email(&self, email: &str) -> CrmResult<Account> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM account \
                 WHERE email = $email LIMIT 1",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("account", format!("email={email}")))?;

        Ok(row.try_into_account()?)
    }
}
