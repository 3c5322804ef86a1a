//! Freelancer CRM database layer: SurrealDB connection management,
//! schema migrations and the tenant-scoped repository
//! implementations of the `crm-core` traits.

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::run_migrations;
