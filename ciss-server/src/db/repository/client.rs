//! Client Repository

use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Client, ClientCreate, ClientUpdate};

#[derive(Clone)]
pub struct ClientRepository {
    base: BaseRepository,
}

impl ClientRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn parse_id(id: &str) -> RepoResult<RecordId> {
        id.parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))
    }

    /// All clients ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Client>> {
        let clients: Vec<Client> = self
            .base
            .db()
            .query("SELECT * FROM client ORDER BY name")
            .await?
            .take(0)?;
        Ok(clients)
    }

    /// Find a client by record id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Client>> {
        let thing = Self::parse_id(id)?;
        let client: Option<Client> = self.base.db().select(thing).await?;
        Ok(client)
    }

    /// Find a client by exact name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Client>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM client WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?;
        let clients: Vec<Client> = result.take(0)?;
        Ok(clients.into_iter().next())
    }

    /// Create a new client
    pub async fn create(&self, data: ClientCreate) -> RepoResult<Client> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Client '{}' already exists",
                data.name
            )));
        }

        let now = Utc::now().to_rfc3339();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE client SET
                    name = $name,
                    requiresResourceId = $requires_resource_id,
                    createdAt = $now,
                    updatedAt = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("requires_resource_id", data.requires_resource_id))
            .bind(("now", now))
            .await?;

        let created: Option<Client> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create client".to_string()))
    }

    /// Update a client
    ///
    /// Renaming does not touch employee records that reference the old name.
    pub async fn update(&self, id: &str, data: ClientUpdate) -> RepoResult<Client> {
        let thing = Self::parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Client {} not found", id)))?;

        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Client '{}' already exists",
                new_name
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    requiresResourceId = IF $has_flag THEN $flag ELSE requiresResourceId END,
                    updatedAt = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("has_flag", data.requires_resource_id.is_some()))
            .bind(("flag", data.requires_resource_id))
            .bind(("now", Utc::now().to_rfc3339()))
            .await?;

        result
            .take::<Option<Client>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Client {} not found", id)))
    }

    /// Hard delete a client
    ///
    /// Employee records keep their `clientName` value; there is no cascade.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = Self::parse_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Client {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
