use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::{BlobStore, DocumentVerifier};
use crate::utils::AppError;

/// Shared server state handed to every handler
///
/// Cloning is shallow: the database handle and JWT service are reference
/// counted, the rest is small.
///
/// | Field | Description |
/// |-------|-------------|
/// | config | Immutable configuration |
/// | db | Embedded SurrealDB service |
/// | jwt_service | Token generation and validation |
/// | storage | Document blob store under `work_dir/uploads` |
/// | verifier | Document verification client |
/// | started_at | Process start time, reported by the health endpoint |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub storage: BlobStore,
    pub verifier: DocumentVerifier,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    /// Initialize all services
    ///
    /// In order: working directory layout, database (with indexes), the
    /// seeded administrator account, then the stateless services.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config.ensure_work_dir_structure()?;

        let db = DbService::new(&config.database_dir().join("ciss.db")).await?;

        db.admin_users()
            .ensure_seeded(&config.admin_username, &config.admin_password)
            .await?;
        if config.is_production() && config.admin_password == "admin123" {
            tracing::warn!("running in production with the default admin password");
        }

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let storage = BlobStore::new(config.uploads_dir());
        let verifier = DocumentVerifier::new(config.verify_api_url.clone());

        Ok(Self {
            config: config.clone(),
            db,
            jwt_service,
            storage,
            verifier,
            started_at: Utc::now(),
        })
    }
}
