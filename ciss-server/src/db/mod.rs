//! Database Module
//!
//! Embedded SurrealDB (RocksDB backend) plus repositories for the three
//! tables: `employee`, `client`, `admin_user`.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;
use repository::{AdminUserRepository, ClientRepository, EmployeeRepository};

const NAMESPACE: &str = "ciss";
const DATABASE: &str = "registry";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database under `db_path`
    pub async fn new(db_path: &Path) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        Self::define_indexes(&db).await?;

        tracing::info!(path = %db_path.display(), "database connection established");

        Ok(Self { db })
    }

    /// In-memory database for tests
    #[cfg(test)]
    pub async fn new_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<surrealdb::engine::local::Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
        Self::define_indexes(&db).await?;
        Ok(Self { db })
    }

    /// Unique indexes on lookup fields
    async fn define_indexes(db: &Surreal<Db>) -> Result<(), AppError> {
        db.query(
            r#"
            DEFINE INDEX IF NOT EXISTS employee_phone ON TABLE employee COLUMNS phoneNumber UNIQUE;
            DEFINE INDEX IF NOT EXISTS employee_registry_id ON TABLE employee COLUMNS employeeId UNIQUE;
            DEFINE INDEX IF NOT EXISTS client_name ON TABLE client COLUMNS name UNIQUE;
            DEFINE INDEX IF NOT EXISTS admin_username ON TABLE admin_user COLUMNS username UNIQUE;
            "#,
        )
        .await
        .map_err(|e| AppError::database(format!("Failed to define indexes: {e}")))?;
        Ok(())
    }

    /// Quick liveness probe for the health endpoint
    pub async fn ping(&self) -> bool {
        self.db.query("RETURN 1").await.is_ok()
    }

    pub fn employees(&self) -> EmployeeRepository {
        EmployeeRepository::new(self.db.clone())
    }

    pub fn clients(&self) -> ClientRepository {
        ClientRepository::new(self.db.clone())
    }

    pub fn admin_users(&self) -> AdminUserRepository {
        AdminUserRepository::new(self.db.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ClientCreate;

    #[tokio::test]
    async fn test_open_memory_and_ping() {
        let db = DbService::new_memory().await.unwrap();
        assert!(db.ping().await);
    }

    #[tokio::test]
    async fn test_client_crud() {
        let db = DbService::new_memory().await.unwrap();
        let repo = db.clients();

        let created = repo
            .create(ClientCreate {
                name: "ABC Industries".to_string(),
                requires_resource_id: false,
            })
            .await
            .unwrap();
        assert_eq!(created.name, "ABC Industries");
        assert!(created.id.is_some());

        // Duplicate name rejected
        assert!(
            repo.create(ClientCreate {
                name: "ABC Industries".to_string(),
                requires_resource_id: false,
            })
            .await
            .is_err()
        );

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);

        let id = created.id.unwrap().to_string();
        let updated = repo
            .update(
                &id,
                crate::db::models::ClientUpdate {
                    name: Some("ABC Industries Ltd".to_string()),
                    requires_resource_id: Some(true),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "ABC Industries Ltd");
        assert!(updated.requires_resource_id);

        assert!(repo.delete(&id).await.unwrap());
        assert!(repo.find_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_admin_seed_is_idempotent() {
        let db = DbService::new_memory().await.unwrap();
        let repo = db.admin_users();
        repo.ensure_seeded("admin", "change-me").await.unwrap();
        repo.ensure_seeded("admin", "change-me").await.unwrap();
        let user = repo.find_by_username("admin").await.unwrap().unwrap();
        assert!(user.verify_password("change-me"));
        assert_eq!(user.role, "admin");
    }
}
