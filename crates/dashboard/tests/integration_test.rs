use dashboard::clients::{DocumentClient, EntityClient};
use dashboard::config::{DashboardConfig, DEACTIVATE_VIA_DELETE_VAR, DOCUMENTS_URL_VAR, USERS_URL_VAR};
use dashboard::errors::UserError;
use dashboard::lifecycle::DashboardSystem;
use dashboard::model::{DocumentCreate, UserCreate, UserUpdate};
use lifecycle_framework::mock::MockTransport;
use lifecycle_framework::{HttpVerb, LifecycleEntity, ResourceClient, StatusFilter};

fn user_params(email: &str, document_number: &str) -> UserCreate {
    UserCreate {
        firstname: "Ana".to_string(),
        lastname: "Ruiz".to_string(),
        document_type: "CC".to_string(),
        document_number: document_number.to_string(),
        email: email.to_string(),
        phone: "555-0101".to_string(),
        password: "s3cret".to_string(),
        ..UserCreate::default()
    }
}

/// The document scenario end to end: create, deactivate, list, delete.
#[tokio::test]
async fn test_document_lifecycle_against_sandbox() {
    let system = DashboardSystem::sandbox().expect("sandbox should start");
    let documents = &system.document_client;

    let draft = DocumentCreate::new("42", "a.pdf", "PDF", "http://x/a.pdf", "admin");
    let created = documents.create_document(&draft).await;
    assert!(created.success, "create failed: {:?}", created.error);
    let created = created.data.expect("created document");
    assert!(created.is_active());
    let id = created.id.clone().expect("server assigns an id");

    // PATCH is rejected by the documents sandbox; PUT takes over.
    let deactivated = documents.deactivate(&id).await;
    assert!(deactivated.success);
    assert_eq!(deactivated.status, 200);

    let active = documents.list_active().await.data.expect("active listing");
    assert!(active.iter().all(|d| d.id.as_deref() != Some(id.as_str())));
    let inactive = documents.list_inactive().await.data.expect("inactive listing");
    assert!(inactive.iter().any(|d| d.id.as_deref() == Some(id.as_str())));

    let by_user = documents.documents_by_user("42").await.data.expect("by user");
    assert_eq!(by_user.len(), 1);

    let stats = documents.user_document_stats("42").await.data.expect("stats");
    assert_eq!(stats.total_documents, 1);
    assert_eq!(stats.inactive_documents, 1);

    let deleted = documents.hard_delete(&id).await;
    assert!(deleted.success);
    assert!(deleted.data.expect("acknowledgement").success);

    let gone = documents.get(&id).await;
    assert!(!gone.success);
    assert_eq!(gone.status, 404);

    system.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_user_lifecycle_against_sandbox() {
    let system = DashboardSystem::sandbox().expect("sandbox should start");
    let users = &system.user_client;

    let created = users.create_user(&user_params("ana@x.io", "1032")).await;
    assert_eq!(created.status, 201);
    let user = created.data.expect("created user");
    let id = user.id.clone().expect("server assigns an id");

    assert!(users.email_exists("ana@x.io").await);
    assert!(!users.email_exists("nobody@x.io").await);
    assert!(users.document_number_exists("1032").await);
    assert_eq!(
        users.find_by_email("ana@x.io").await.map(|u| u.map(|u| u.full_name())),
        Ok(Some("Ana Ruiz".to_string()))
    );

    let mut update = UserUpdate::from(&user);
    update.phone = "555-0199".to_string();
    let updated = users.update_user(&id, &update).await;
    assert_eq!(updated.data.expect("updated user").phone, "555-0199");

    let deactivated = users.deactivate(&id).await;
    assert!(deactivated.success);
    assert!(!users.get(&id).await.data.expect("user").is_active());

    let found = users.search_users("ruiz", StatusFilter::Inactive).await;
    assert_eq!(found.data.map(|u| u.len()), Some(1));

    let stats = users.stats().await.data.expect("stats");
    assert_eq!((stats.total, stats.active, stats.inactive), (1, 0, 1));

    system.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_user_restore_route_is_configured() {
    let system = DashboardSystem::sandbox().expect("sandbox should start");
    let users = &system.user_client;

    let id = users
        .create_user(&user_params("restore@x.io", "77"))
        .await
        .data
        .and_then(|u| u.id)
        .expect("created user id");
    assert!(users.deactivate(&id).await.success);

    // Users come back through `/{id}/restore`.
    let restored = users.activate(&id).await;
    assert!(restored.success, "restore failed: {:?}", restored.error);
    assert_eq!(restored.status, 200);
    let user = restored
        .data
        .and_then(|change| change.into_entity())
        .expect("restored user in the body");
    assert!(user.is_active());
    assert!(users.get(&id).await.data.expect("user").is_active());

    system.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_bulk_reports_partial_failure() {
    let system = DashboardSystem::sandbox().expect("sandbox should start");
    let documents = &system.document_client;

    let mut ids = Vec::new();
    for name in ["a.pdf", "b.pdf"] {
        let draft = DocumentCreate::new("42", name, "PDF", "http://x/doc", "admin");
        let created = documents.create_document(&draft).await;
        ids.push(created.data.and_then(|d| d.id).expect("created id"));
    }
    ids.insert(1, "404".to_string());

    let result = documents.deactivate_many(&ids).await;

    assert!(result.success);
    assert_eq!(result.error.as_deref(), Some("1 of 3 operations failed"));
    let report = result.data.expect("report");
    assert_eq!(report.successful, vec![ids[0].clone(), ids[2].clone()]);
    assert_eq!(report.errors[0].id, "404");

    system.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_validation_never_reaches_the_network() {
    let mock = MockTransport::new();
    let config = DashboardConfig::new("http://mock.local/api/users", "http://mock.local/api/documents")
        .expect("valid urls");
    let system = DashboardSystem::with_transports(config, mock.transport(), mock.transport());

    let created = system.user_client.create_user(&UserCreate::default()).await;
    assert_eq!(created.status, 400);
    assert!(created
        .error
        .expect("validation message")
        .starts_with("Required fields are missing: firstname"));

    let bad_email = system
        .user_client
        .create_user(&user_params("not-an-email", "1"))
        .await;
    assert_eq!(bad_email.error.as_deref(), Some("Invalid email format"));

    assert_eq!(
        system.user_client.find_by_email("   ").await,
        Ok(None::<dashboard::model::User>)
    );
    assert_eq!(
        system.user_client.find_by_email("..").await,
        Ok(None::<dashboard::model::User>)
    );

    let deleted = system.document_client.hard_delete("..").await;
    assert_eq!(deleted.status, 400);
    assert_eq!(deleted.error.as_deref(), Some("Document ID is invalid"));
    assert_eq!(system.user_client.deactivate(".").await.status, 400);
    assert_eq!(mock.call_count(), 0);
    mock.verify();
}

#[tokio::test]
async fn test_deactivate_via_delete_from_environment() {
    let vars = [
        (USERS_URL_VAR, "http://mock.local/api/users"),
        (DOCUMENTS_URL_VAR, "http://mock.local/api/documents"),
        (DEACTIVATE_VIA_DELETE_VAR, "1"),
    ];
    let config = DashboardConfig::from_lookup(|name| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    })
    .expect("config");

    let mock = MockTransport::new();
    mock.expect(HttpVerb::Delete, "/api/documents/5").respond(405);
    mock.expect(HttpVerb::Put, "/api/documents/5/deactivate")
        .respond(204);

    let client = DocumentClient::new(ResourceClient::new(config.documents, mock.transport()));
    let result = client.deactivate("5").await;

    assert!(result.success);
    assert_eq!(result.status, 204);
    mock.verify();
}

#[tokio::test]
async fn test_service_errors_map_to_domain() {
    let mock = MockTransport::new();
    mock.expect(HttpVerb::Get, "/api/users/email/a@b.co")
        .respond_json(500, &serde_json::json!({ "message": "Database down" }));

    let config = DashboardConfig::new("http://mock.local/api/users", "http://mock.local/api/documents")
        .expect("valid urls");
    let system = DashboardSystem::with_transports(config, mock.transport(), mock.transport());

    assert_eq!(
        system.user_client.find_by_email("a@b.co").await,
        Err(UserError::ServiceError {
            status: 500,
            message: "Database down".to_string()
        })
    );
}
