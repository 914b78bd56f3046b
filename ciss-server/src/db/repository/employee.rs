//! Employee Repository
//!
//! Reads go through [`RawEmployee`] so legacy records are normalized exactly
//! once, at this boundary. Everything returned from here is the current shape.

use chrono::Utc;
use serde_json::{Map, Value};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Employee, RawEmployee};

/// Filters applied to a cursor-paginated listing
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Only records strictly older than this RFC 3339 timestamp
    pub cursor: Option<String>,
    pub status: Option<String>,
    pub client_name: Option<String>,
    pub district: Option<String>,
}

#[derive(Clone)]
pub struct EmployeeRepository {
    base: BaseRepository,
}

impl EmployeeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn parse_id(id: &str) -> RepoResult<RecordId> {
        id.parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))
    }

    /// Insert a new employee record
    pub async fn create(&self, employee: Employee) -> RepoResult<Employee> {
        if self
            .find_by_phone(&employee.phone_number)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "An employee with phone number {} is already enrolled",
                employee.phone_number
            )));
        }

        let created: Option<Employee> = self.base.db().create("employee").content(employee).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create employee".to_string()))
    }

    /// Find an employee by record id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Employee>> {
        let thing = Self::parse_id(id)?;
        let raw: Option<RawEmployee> = self.base.db().select(thing).await?;
        Ok(raw.map(Employee::from_raw))
    }

    /// Find an employee by phone number
    pub async fn find_by_phone(&self, phone: &str) -> RepoResult<Option<Employee>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM employee WHERE phoneNumber = $phone LIMIT 1")
            .bind(("phone", phone.to_string()))
            .await?;
        let raw: Vec<RawEmployee> = result.take(0)?;
        Ok(raw.into_iter().next().map(Employee::from_raw))
    }

    /// Find an employee by registry id (`CISS/...`)
    pub async fn find_by_employee_id(&self, employee_id: &str) -> RepoResult<Option<Employee>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM employee WHERE employeeId = $employee_id LIMIT 1")
            .bind(("employee_id", employee_id.to_string()))
            .await?;
        let raw: Vec<RawEmployee> = result.take(0)?;
        Ok(raw.into_iter().next().map(Employee::from_raw))
    }

    /// One cursor page, newest first
    ///
    /// Fetches `limit + 1` rows; the caller uses the extra row to decide
    /// whether more pages exist.
    pub async fn list_page(&self, filter: &ListFilter, limit: usize) -> RepoResult<Vec<Employee>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT * FROM employee
                WHERE (!$has_cursor OR createdAt < $cursor)
                  AND (!$has_status OR status = $status)
                  AND (!$has_client OR clientName = $client)
                  AND (!$has_district OR district = $district)
                ORDER BY createdAt DESC
                LIMIT $limit"#,
            )
            .bind(("has_cursor", filter.cursor.is_some()))
            .bind(("cursor", filter.cursor.clone()))
            .bind(("has_status", filter.status.is_some()))
            .bind(("status", filter.status.clone()))
            .bind(("has_client", filter.client_name.is_some()))
            .bind(("client", filter.client_name.clone()))
            .bind(("has_district", filter.district.is_some()))
            .bind(("district", filter.district.clone()))
            .bind(("limit", limit + 1))
            .await?;
        let raw: Vec<RawEmployee> = result.take(0)?;
        Ok(raw.into_iter().map(Employee::from_raw).collect())
    }

    /// All employees whose search tokens contain the term
    ///
    /// `term` must already be uppercased and trimmed; matches are exact
    /// token membership, not substring. Equality filters compose with the
    /// containment check, but no ordering is applied and no cursor is used;
    /// the directory slices the full result set in memory. `filter.cursor`
    /// is ignored here.
    pub async fn search(&self, term: &str, filter: &ListFilter) -> RepoResult<Vec<Employee>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT * FROM employee
                WHERE searchableFields CONTAINS $term
                  AND (!$has_status OR status = $status)
                  AND (!$has_client OR clientName = $client)
                  AND (!$has_district OR district = $district)"#,
            )
            .bind(("term", term.to_string()))
            .bind(("has_status", filter.status.is_some()))
            .bind(("status", filter.status.clone()))
            .bind(("has_client", filter.client_name.is_some()))
            .bind(("client", filter.client_name.clone()))
            .bind(("has_district", filter.district.is_some()))
            .bind(("district", filter.district.clone()))
            .await?;
        let raw: Vec<RawEmployee> = result.take(0)?;
        Ok(raw.into_iter().map(Employee::from_raw).collect())
    }

    /// Merge a partial update document into the record
    ///
    /// `doc` holds only the changed fields (storage keys); `updatedAt` is
    /// stamped here.
    pub async fn merge(&self, id: &str, mut doc: Map<String, Value>) -> RepoResult<Employee> {
        let thing = Self::parse_id(id)?;
        doc.insert(
            "updatedAt".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", thing))
            .bind(("data", doc))
            .await?;

        result
            .take::<Option<RawEmployee>>(0)?
            .map(Employee::from_raw)
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))
    }

    /// Hard delete an employee record
    pub async fn delete(&self, id: &str) -> RepoResult<Employee> {
        let thing = Self::parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(existing)
    }
}
