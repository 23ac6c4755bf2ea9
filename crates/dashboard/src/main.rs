//! # Dashboard Demo
//!
//! Runs the document and user lifecycles end to end.
//!
//! With `DASHBOARD_USERS_URL` and `DASHBOARD_DOCUMENTS_URL` set (directly or
//! in `.env`) it talks to the real services; otherwise it starts in-memory
//! sandbox backends, where the documents backend rejects `PATCH` to show
//! the verb fallback at work.
//!
//! ```bash
//! RUST_LOG=info cargo run -p dashboard
//! RUST_LOG=debug cargo run -p dashboard   # every request and fallback step
//! ```

use dashboard::clients::EntityClient;
use dashboard::config::DashboardConfig;
use dashboard::lifecycle::DashboardSystem;
use dashboard::model::{DocumentCreate, UserCreate};
use lifecycle_framework::tracing::setup_tracing;
use lifecycle_framework::{ConfigError, LifecycleEntity, StatusFilter};
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let system = match DashboardConfig::from_env() {
        Ok(config) => DashboardSystem::connect(config),
        Err(ConfigError::MissingVar(name)) => {
            info!(missing = %name, "No service configuration, using sandbox backends");
            DashboardSystem::sandbox()
        }
        Err(e) => return Err(e.to_string()),
    }
    .map_err(|e| e.to_string())?;

    let span = tracing::info_span!("document_lifecycle");
    async {
        let draft = DocumentCreate::new("42", "a.pdf", "PDF", "http://x/a.pdf", "admin")
            .with_description("Signed enrollment form");
        let created = system.document_client.create_document(&draft).await;
        let Some(document_id) = created.data.as_ref().and_then(|d| d.id.clone()) else {
            error!(status = created.status, error = ?created.error, "Document creation failed");
            return;
        };
        info!(document_id = %document_id, "Document created");

        let deactivated = system.document_client.deactivate(&document_id).await;
        info!(
            status = deactivated.status,
            success = deactivated.success,
            "Document deactivated"
        );

        let active = system.document_client.list_active().await;
        let inactive = system.document_client.list_inactive().await;
        info!(
            active = active.data.map_or(0, |d| d.len()),
            inactive = inactive.data.map_or(0, |d| d.len()),
            "Listings after deactivation"
        );

        let stats = system.document_client.user_document_stats("42").await;
        if let Some(stats) = stats.data {
            info!(
                total = stats.total_documents,
                inactive = stats.inactive_documents,
                "Stats for user 42"
            );
        }

        let deleted = system.document_client.hard_delete(&document_id).await;
        info!(status = deleted.status, "Document hard-deleted");

        let lookup = system.document_client.get(&document_id).await;
        if lookup.success {
            warn!("Deleted document is still readable");
        } else {
            info!(status = lookup.status, error = ?lookup.error, "Deleted document is gone");
        }
    }
    .instrument(span)
    .await;

    let span = tracing::info_span!("user_lifecycle");
    async {
        let params = UserCreate {
            firstname: "Ana".to_string(),
            lastname: "Ruiz".to_string(),
            document_type: "CC".to_string(),
            document_number: "1032456789".to_string(),
            email: "ana.ruiz@example.com".to_string(),
            phone: "555-0101".to_string(),
            password: "change-me".to_string(),
            ..UserCreate::default()
        };

        if system.user_client.email_exists(&params.email).await {
            warn!(email = %params.email, "Email already registered, skipping creation");
            return;
        }

        let created = system.user_client.create_user(&params).await;
        let Some(user) = created.data else {
            error!(status = created.status, error = ?created.error, "User creation failed");
            return;
        };
        let Some(user_id) = user.id.clone() else {
            error!("Service returned a user without an id");
            return;
        };
        info!(user_id = %user_id, full_name = %user.full_name(), "User created");

        let deactivated = system.user_client.deactivate(&user_id).await;
        info!(success = deactivated.success, "User deactivated");

        let restored = system.user_client.activate(&user_id).await;
        let active = restored
            .data
            .and_then(|change| change.into_entity())
            .is_some_and(|u| u.is_active());
        info!(success = restored.success, active, "User restored");

        let found = system
            .user_client
            .search_users("ruiz", StatusFilter::Active)
            .await;
        info!(matches = found.data.map_or(0, |u| u.len()), "Search finished");

        let bulk = system
            .user_client
            .deactivate_many(&[user_id.clone(), "does-not-exist".to_string()])
            .await;
        if let Some(report) = bulk.data {
            info!(
                succeeded = report.successful_count,
                failed = report.error_count,
                "Bulk deactivation finished"
            );
        }
    }
    .instrument(span)
    .await;

    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Dashboard demo completed");
    Ok(())
}
