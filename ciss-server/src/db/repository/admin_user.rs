//! Admin User Repository

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::AdminUser;

#[derive(Clone)]
pub struct AdminUserRepository {
    base: BaseRepository,
}

impl AdminUserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<AdminUser>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM admin_user WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await?;
        let users: Vec<AdminUser> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create an admin user with an already-hashed password
    pub async fn create(&self, username: &str, hash_pass: &str, role: &str) -> RepoResult<AdminUser> {
        if self.find_by_username(username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                username
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE admin_user SET
                    username = $username,
                    hashPass = $hash_pass,
                    role = $role,
                    isActive = true,
                    createdAt = $now
                RETURN AFTER"#,
            )
            .bind(("username", username.to_string()))
            .bind(("hash_pass", hash_pass.to_string()))
            .bind(("role", role.to_string()))
            .bind(("now", Utc::now().to_rfc3339()))
            .await?;

        let created: Option<AdminUser> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create admin user".to_string()))
    }

    /// Seed the default admin account on first startup
    ///
    /// Does nothing when the username already exists.
    pub async fn ensure_seeded(&self, username: &str, password: &str) -> RepoResult<()> {
        if self.find_by_username(username).await?.is_some() {
            return Ok(());
        }

        let hash_pass = AdminUser::hash_password(password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;
        self.create(username, &hash_pass, "admin").await?;
        tracing::info!(username = %username, "seeded default admin user");
        Ok(())
    }
}
