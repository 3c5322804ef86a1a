//! Integration tests for the Client repository using in-memory SurrealDB.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use crm_core::error::CrmError;
use crm_core::models::client::ClientInput;
use crm_core::models::interaction_log::{InteractionLogInput, InteractionType};
use crm_core::models::project::{ProjectInput, ProjectStatus};
use crm_core::models::reminder::ReminderInput;
use crm_core::repository::{
    ClientRepository, InteractionLogRepository, ProjectRepository, ReminderRepository,
};
use crm_db::repository::{
    SurrealClientRepository, SurrealInteractionLogRepository, SurrealProjectRepository,
    SurrealReminderRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    crm_db::run_migrations(&db).await.unwrap();
    db
}

fn ada() -> ClientInput {
    ClientInput {
        name: "Ada".into(),
        email: "ada@x.io".into(),
        phone: "123".into(),
        company: None,
        notes: None,
    }
}

fn named(name: &str) -> ClientInput {
    ClientInput {
        name: name.into(),
        ..ada()
    }
}

#[tokio::test]
async fn create_and_get_client() {
    let db = setup().await;
    let repo = SurrealClientRepository::new(db);
    let user = Uuid::new_v4();

    let created = repo.create(user, ada()).await.unwrap();
    assert_eq!(created.user_id, user);
    assert_eq!(created.name, "Ada");
    assert_eq!(created.company, None);

    let fetched = repo.get_by_id(user, created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn list_is_newest_first_and_tenant_scoped() {
    let db = setup().await;
    let repo = SurrealClientRepository::new(db);
    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();

    repo.create(user_a, named("first")).await.unwrap();
    std::thread::sleep(Duration::from_millis(5));
    repo.create(user_a, named("second")).await.unwrap();
    repo.create(user_b, named("other")).await.unwrap();

    let listed = repo.list(user_a).await.unwrap();
    let names: Vec<_> = listed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["second", "first"]);

    assert!(repo.list(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn foreign_client_is_not_found_everywhere() {
    let db = setup().await;
    let repo = SurrealClientRepository::new(db);
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();

    let client = repo.create(owner, ada()).await.unwrap();

    let err = repo.get_by_id(intruder, client.id).await.unwrap_err();
    assert!(matches!(err, CrmError::NotFound { .. }));

    let err = repo.update(intruder, client.id, named("Mallory")).await.unwrap_err();
    assert!(matches!(err, CrmError::NotFound { .. }));

    let err = repo.delete(intruder, client.id).await.unwrap_err();
    assert!(matches!(err, CrmError::NotFound { .. }));

    // The owner's row is untouched.
    let still = repo.get_by_id(owner, client.id).await.unwrap();
    assert_eq!(still.name, "Ada");
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_identity() {
    let db = setup().await;
    let repo = SurrealClientRepository::new(db);
    let user = Uuid::new_v4();

    let client = repo.create(user, ada()).await.unwrap();
    let updated = repo
        .update(
            user,
            client.id,
            ClientInput {
                company: Some("Analytical Engines".into()),
                ..named("Ada Lovelace")
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, client.id);
    assert_eq!(updated.user_id, user);
    assert_eq!(updated.created_at, client.created_at);
    assert_eq!(updated.name, "Ada Lovelace");
    assert_eq!(updated.company.as_deref(), Some("Analytical Engines"));
}

#[tokio::test]
async fn missing_client_is_not_found() {
    let db = setup().await;
    let repo = SurrealClientRepository::new(db);

    let err = repo.get_by_id(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CrmError::NotFound { .. }));
}

#[tokio::test]
async fn delete_cascades_to_projects_and_logs_and_detaches_reminders() {
    let db = setup().await;
    let clients = SurrealClientRepository::new(db.clone());
    let projects = SurrealProjectRepository::new(db.clone());
    let logs = SurrealInteractionLogRepository::new(db.clone());
    let reminders = SurrealReminderRepository::new(db);
    let user = Uuid::new_v4();
    let when = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();

    let client = clients.create(user, ada()).await.unwrap();
    let keeper = clients.create(user, named("Grace")).await.unwrap();
    let project = projects
        .create(
            user,
            ProjectInput {
                client_id: client.id,
                title: "Engine".into(),
                description: None,
                budget: 100.0,
                deadline: when,
                status: ProjectStatus::Planned,
            },
        )
        .await
        .unwrap();

    let log_input = |client_id, project_id| InteractionLogInput {
        client_id,
        project_id,
        date: when,
        kind: InteractionType::Call,
        notes: None,
    };
    logs.create(user, log_input(Some(client.id), None)).await.unwrap();
    logs.create(user, log_input(None, Some(project.id))).await.unwrap();
    let kept_log = logs.create(user, log_input(Some(keeper.id), None)).await.unwrap();

    let reminder = reminders
        .create(
            user,
            ReminderInput {
                client_id: Some(client.id),
                project_id: Some(project.id),
                note: "follow up".into(),
                due_date: when,
            },
        )
        .await
        .unwrap();

    clients.delete(user, client.id).await.unwrap();

    let err = clients.get_by_id(user, client.id).await.unwrap_err();
    assert!(matches!(err, CrmError::NotFound { .. }));
    assert!(projects.list(user).await.unwrap().is_empty());

    let remaining: Vec<_> = logs.list(user).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept_log.id);

    let detached = reminders.get_by_id(user, reminder.id).await.unwrap();
    assert_eq!(detached.client_id, None);
    assert_eq!(detached.project_id, None);
    assert_eq!(detached.note, "follow up");

    // Deleting again is a miss.
    let err = clients.delete(user, client.id).await.unwrap_err();
    assert!(matches!(err, CrmError::NotFound { .. }));
}

#[tokio::test]
async fn identical_update_twice_is_idempotent() {
    let db = setup().await;
    let repo = SurrealClientRepository::new(db);
    let user = Uuid::new_v4();

    let client = repo.create(user, ada()).await.unwrap();
    let input = ClientInput {
        notes: Some("prefers email".into()),
        ..named("Ada Lovelace")
    };

    let first = repo.update(user, client.id, input.clone()).await.unwrap();
    let second = repo.update(user, client.id, input).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(repo.get_by_id(user, client.id).await.unwrap(), second);
}

#[tokio::test]
async fn foreign_delete_leaves_dependents_intact() {
    let db = setup().await;
    let clients = SurrealClientRepository::new(db.clone());
    let projects = SurrealProjectRepository::new(db.clone());
    let logs = SurrealInteractionLogRepository::new(db);
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let when = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();

    let client = clients.create(owner, ada()).await.unwrap();
    projects
        .create(
            owner,
            ProjectInput {
                client_id: client.id,
                title: "Engine".into(),
                description: None,
                budget: 100.0,
                deadline: when,
                status: ProjectStatus::Planned,
            },
        )
        .await
        .unwrap();
    logs.create(
        owner,
        InteractionLogInput {
            client_id: Some(client.id),
            project_id: None,
            date: when,
            kind: InteractionType::Email,
            notes: None,
        },
    )
    .await
    .unwrap();

    let err = clients.delete(intruder, client.id).await.unwrap_err();
    assert!(matches!(err, CrmError::NotFound { ref entity, .. } if entity == "client"));

    assert_eq!(projects.list(owner).await.unwrap().len(), 1);
    assert_eq!(logs.list(owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_only_detaches_the_owners_reminders() {
    let db = setup().await;
    let clients = SurrealClientRepository::new(db.clone());
    let reminders = SurrealReminderRepository::new(db);
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();
    let when = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();

    let client = clients.create(owner, ada()).await.unwrap();

    // Reminder links are informational, so another tenant may name any id.
    let theirs = reminders
        .create(
            other,
            ReminderInput {
                client_id: Some(client.id),
                project_id: None,
                note: "not yours".into(),
                due_date: when,
            },
        )
        .await
        .unwrap();

    clients.delete(owner, client.id).await.unwrap();

    let untouched = reminders.get_by_id(other, theirs.id).await.unwrap();
    assert_eq!(untouched.client_id, Some(client.id));
}
