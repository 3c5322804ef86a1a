//! Repository trait definitions for data access abstraction.
//!
//! Every operation on CRM records takes the caller's `user_id` (the
//! tenant) and only ever sees rows inside that tenant's scope. A row
//! that exists but belongs to someone else is reported exactly like a
//! row that does not exist.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::CrmResult;
use crate::models::{
    account::{Account, CreateAccount},
    client::{Client, ClientInput},
    dashboard::DashboardSummary,
    interaction_log::{InteractionLog, InteractionLogInput},
    project::{Project, ProjectInput},
    reminder::{Reminder, ReminderInput},
};

// ---------------------------------------------------------------------------
// Identity (global scope)
// ---------------------------------------------------------------------------

pub trait AccountRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the email is taken.
    fn create(&self, input: CreateAccount) -> impl Future<Output = CrmResult<Account>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CrmResult<Account>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = CrmResult<Account>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant-scoped repositories
// ---------------------------------------------------------------------------

pub trait ClientRepository: Send + Sync {
    fn create(
        &self,
        user_id: Uuid,
        input: ClientInput,
    ) -> impl Future<Output = CrmResult<Client>> + Send;
    /// Newest first.
    fn list(&self, user_id: Uuid) -> impl Future<Output = CrmResult<Vec<Client>>> + Send;
    fn get_by_id(&self, user_id: Uuid, id: Uuid)
    -> impl Future<Output = CrmResult<Client>> + Send;
    fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: ClientInput,
    ) -> impl Future<Output = CrmResult<Client>> + Send;
    /// Also removes the client's projects and their interaction logs,
    /// and detaches the tenant's reminders from them.
    fn delete(&self, user_id: Uuid, id: Uuid) -> impl Future<Output = CrmResult<()>> + Send;
}

pub trait ProjectRepository: Send + Sync {
    /// Fails with `NotFound` when `input.client_id` is not one of the
    /// tenant's clients.
    fn create(
        &self,
        user_id: Uuid,
        input: ProjectInput,
    ) -> impl Future<Output = CrmResult<Project>> + Send;
    /// Newest first.
    fn list(&self, user_id: Uuid) -> impl Future<Output = CrmResult<Vec<Project>>> + Send;
    fn get_by_id(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = CrmResult<Project>> + Send;
    fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: ProjectInput,
    ) -> impl Future<Output = CrmResult<Project>> + Send;
    fn delete(&self, user_id: Uuid, id: Uuid) -> impl Future<Output = CrmResult<()>> + Send;
}

pub trait InteractionLogRepository: Send + Sync {
    fn create(
        &self,
        user_id: Uuid,
        input: InteractionLogInput,
    ) -> impl Future<Output = CrmResult<InteractionLog>> + Send;
    /// Newest first.
    fn list(&self, user_id: Uuid)
    -> impl Future<Output = CrmResult<Vec<InteractionLog>>> + Send;
    fn get_by_id(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = CrmResult<InteractionLog>> + Send;
    fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: InteractionLogInput,
    ) -> impl Future<Output = CrmResult<InteractionLog>> + Send;
    fn delete(&self, user_id: Uuid, id: Uuid) -> impl Future<Output = CrmResult<()>> + Send;
}

pub trait ReminderRepository: Send + Sync {
    fn create(
        &self,
        user_id: Uuid,
        input: ReminderInput,
    ) -> impl Future<Output = CrmResult<Reminder>> + Send;
    /// Soonest due first.
    fn list(&self, user_id: Uuid) -> impl Future<Output = CrmResult<Vec<Reminder>>> + Send;
    /// Reminders due within `[from, to]`, both ends inclusive, soonest
    /// first.
    fn list_due_between(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> impl Future<Output = CrmResult<Vec<Reminder>>> + Send;
    fn get_by_id(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = CrmResult<Reminder>> + Send;
    fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: ReminderInput,
    ) -> impl Future<Output = CrmResult<Reminder>> + Send;
    fn delete(&self, user_id: Uuid, id: Uuid) -> impl Future<Output = CrmResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Dashboard (read-only aggregation)
// ---------------------------------------------------------------------------

pub trait DashboardRepository: Send + Sync {
    /// Compute the summary as seen at `now`. Either every figure is
    /// returned or the call fails; there is no partial summary.
    fn summary_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> impl Future<Output = CrmResult<DashboardSummary>> + Send;
}
