//! SurrealDB repository implementations.
//!
//! Tenancy is enforced inside each statement: reads and mutations carry
//! a `WHERE` clause that ties the row back to `$user_id`, either
//! directly or through the subqueries below.

mod account;
mod client;
mod dashboard;
mod interaction_log;
mod project;
mod reminder;

pub use account::SurrealAccountRepository;
pub use client::SurrealClientRepository;
pub use dashboard::SurrealDashboardRepository;
pub use interaction_log::SurrealInteractionLogRepository;
pub use project::SurrealProjectRepository;
pub use reminder::SurrealReminderRepository;

use surrealdb::{Connection, IndexedResults, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Ids of the clients owned by `$user_id`.
const OWNED_CLIENT_IDS: &str = "(SELECT VALUE meta::id(id) FROM client WHERE user_id = $user_id)";

/// Ids of the projects whose client is owned by `$user_id`.
const OWNED_PROJECT_IDS: &str = "(SELECT VALUE meta::id(id) FROM project \
     WHERE client_id IN (SELECT VALUE meta::id(id) FROM client WHERE user_id = $user_id))";

/// Thrown from inside a cascade transaction when the target row is not
/// the caller's; the whole transaction rolls back.
const NOT_OWNED: &str = "crm:not_owned";

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_uuid(what: &str, raw: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::InvalidRow(format!("invalid {what} UUID: {e}")))
}

fn parse_optional_uuid(what: &str, raw: Option<String>) -> Result<Option<Uuid>, DbError> {
    raw.map(|r| parse_uuid(what, &r)).transpose()
}

/// Fail with `NotFound` unless `client_id` is one of `user_id`'s clients.
async fn ensure_owned_client<C: Connection>(
    db: &Surreal<C>,
    user_id: Uuid,
    client_id: Uuid,
) -> Result<(), DbError> {
    let mut result = db
        .query(
            "SELECT count() AS total FROM client \
             WHERE id = type::record('client', $client_id) \
             AND user_id = $user_id GROUP ALL",
        )
        .bind(("client_id", client_id.to_string()))
        .bind(("user_id", user_id.to_string()))
        .await?;

    let rows: Vec<CountRow> = result.take(0)?;
    if rows.first().map(|r| r.total).unwrap_or(0) == 0 {
        return Err(DbError::not_found("client", client_id));
    }
    Ok(())
}

/// Fail with `NotFound` unless `project_id` belongs to one of
/// `user_id`'s clients.
async fn ensure_owned_project<C: Connection>(
    db: &Surreal<C>,
    user_id: Uuid,
    project_id: Uuid,
) -> Result<(), DbError> {
    let query = format!(
        "SELECT count() AS total FROM project \
         WHERE id = type::record('project', $project_id) \
         AND client_id IN {OWNED_CLIENT_IDS} GROUP ALL"
    );
    let mut result = db
        .query(query)
        .bind(("project_id", project_id.to_string()))
        .bind(("user_id", user_id.to_string()))
        .await?;

    let rows: Vec<CountRow> = result.take(0)?;
    if rows.first().map(|r| r.total).unwrap_or(0) == 0 {
        return Err(DbError::not_found("project", project_id));
    }
    Ok(())
}

/// Resolve the outcome of a cascade transaction.
///
/// A failed statement marks every earlier statement of the transaction as
/// not executed, so the first error is rarely the interesting one.
fn check_cascade(mut response: IndexedResults, entity: &str, id: &str) -> Result<(), DbError> {
    let mut errors: Vec<(usize, surrealdb::Error)> = response.take_errors().into_iter().collect();
    if errors.is_empty() {
        return Ok(());
    }
    if errors.iter().any(|(_, e)| e.to_string().contains(NOT_OWNED)) {
        return Err(DbError::not_found(entity, id));
    }

    errors.sort_by_key(|(index, _)| *index);
    let position = errors
        .iter()
        .position(|(_, e)| !e.to_string().contains("not executed"))
        .unwrap_or(0);
    Err(errors.swap_remove(position).1.into())
}
