//! Directory listing
//!
//! The employee directory runs one of two query strategies, chosen by
//! whether a search term is present:
//!
//! - [`CursorQuery`]: equality filters plus creation-time ordering, paged
//!   with "created before the last row of the previous page" cursors.
//! - [`SearchQuery`]: equality filters plus token containment against
//!   `searchableFields`. The backend cannot combine containment with
//!   ordering and cursors, so the full match set is fetched and sliced
//!   in memory.
//!
//! Both implement [`PaginatedQuery`] and produce the same page shape, so
//! handlers never branch on the mode.

use serde::{Deserialize, Serialize};

use crate::db::models::Employee;
use crate::db::repository::employee::{EmployeeRepository, ListFilter};
use crate::services::searchable::normalize_search_term;
use crate::utils::AppError;

/// Directory page size
pub const ITEMS_PER_PAGE: usize = 10;

/// Query-string parameters accepted by the directory endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryParams {
    /// Free-text search term; presence switches the query strategy
    pub search: Option<String>,
    pub client: Option<String>,
    pub status: Option<String>,
    pub district: Option<String>,
    /// `createdAt` of the last row of the previous page (cursor mode)
    pub cursor: Option<String>,
    /// 1-based page number (search mode)
    pub page: Option<usize>,
}

/// One directory page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryPage {
    pub items: Vec<Employee>,
    /// Whether a next page exists ("next" stays enabled)
    pub has_more: bool,
    /// Cursor for the next page (cursor mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// A named pagination strategy producing directory pages
#[allow(async_fn_in_trait)]
pub trait PaginatedQuery {
    async fn fetch_page(&self, repo: &EmployeeRepository) -> Result<DirectoryPage, AppError>;
}

/// Cursor-paged listing, newest first
#[derive(Debug, Clone)]
pub struct CursorQuery {
    pub filter: ListFilter,
    pub limit: usize,
}

impl PaginatedQuery for CursorQuery {
    async fn fetch_page(&self, repo: &EmployeeRepository) -> Result<DirectoryPage, AppError> {
        let mut rows = repo.list_page(&self.filter, self.limit).await?;
        let has_more = rows.len() > self.limit;
        rows.truncate(self.limit);
        let next_cursor = if has_more {
            rows.last().map(|e| e.created_at.clone())
        } else {
            None
        };
        Ok(DirectoryPage {
            items: rows,
            has_more,
            next_cursor,
        })
    }
}

/// Token search with in-memory slicing
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Already uppercased and trimmed
    pub term: String,
    pub filter: ListFilter,
    /// 1-based
    pub page: usize,
    pub per_page: usize,
}

impl PaginatedQuery for SearchQuery {
    async fn fetch_page(&self, repo: &EmployeeRepository) -> Result<DirectoryPage, AppError> {
        let matches = repo.search(&self.term, &self.filter).await?;
        let (items, has_more) = slice_page(matches, self.page, self.per_page);
        Ok(DirectoryPage {
            items,
            has_more,
            next_cursor: None,
        })
    }
}

/// The strategy selected for one request
#[derive(Debug, Clone)]
pub enum DirectoryQuery {
    Cursor(CursorQuery),
    Search(SearchQuery),
}

impl DirectoryQuery {
    /// Pick the strategy from request parameters
    ///
    /// A blank search term falls back to cursor mode.
    pub fn from_params(params: DirectoryParams) -> Self {
        let filter = ListFilter {
            cursor: None,
            status: params.status,
            client_name: params.client,
            district: params.district,
        };

        match params.search.as_deref().and_then(normalize_search_term) {
            Some(term) => DirectoryQuery::Search(SearchQuery {
                term,
                filter,
                page: params.page.unwrap_or(1).max(1),
                per_page: ITEMS_PER_PAGE,
            }),
            None => DirectoryQuery::Cursor(CursorQuery {
                filter: ListFilter {
                    cursor: params.cursor,
                    ..filter
                },
                limit: ITEMS_PER_PAGE,
            }),
        }
    }
}

impl PaginatedQuery for DirectoryQuery {
    async fn fetch_page(&self, repo: &EmployeeRepository) -> Result<DirectoryPage, AppError> {
        match self {
            DirectoryQuery::Cursor(q) => q.fetch_page(repo).await,
            DirectoryQuery::Search(q) => q.fetch_page(repo).await,
        }
    }
}

/// Slice one 1-based page out of a full result set
///
/// `has_more` is true while rows remain past the requested page.
pub fn slice_page<T>(items: Vec<T>, page: usize, per_page: usize) -> (Vec<T>, bool) {
    let page = page.max(1);
    let total = items.len();
    // page comes straight off the query string; saturate instead of overflowing
    let start = (page - 1).saturating_mul(per_page);
    let has_more = total > page.saturating_mul(per_page);
    let sliced = items.into_iter().skip(start).take(per_page).collect();
    (sliced, has_more)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{EmployeeStatus, MaritalStatus};
    use crate::services::searchable::build_searchable_fields;

    fn make_employee(i: usize, client: &str) -> Employee {
        let phone = format!("98765432{:02}", i);
        let full_name = format!("Guard Number{}", i);
        let employee_id = format!("CISS/AI/2024-25/{:03}", i);
        Employee {
            id: None,
            searchable_fields: build_searchable_fields(&full_name, &employee_id, &phone),
            employee_id,
            full_name: full_name.clone(),
            first_name: "Guard".to_string(),
            last_name: format!("Number{}", i),
            gender: "Male".to_string(),
            date_of_birth: "1990-01-15".to_string(),
            father_name: "F".to_string(),
            mother_name: "M".to_string(),
            marital_status: MaritalStatus::Single,
            spouse_name: None,
            phone_number: phone,
            email_address: format!("guard{}@example.com", i),
            district: "Kamrup".to_string(),
            full_address: "12 Station Road".to_string(),
            client_name: client.to_string(),
            resource_id_number: None,
            joining_date: "2024-05-01".to_string(),
            status: EmployeeStatus::Active,
            exit_date: None,
            identity_proof_type: "Aadhaar".to_string(),
            identity_proof_number: "1".to_string(),
            address_proof_type: "Aadhaar".to_string(),
            address_proof_number: "1".to_string(),
            bank_name: "B".to_string(),
            bank_account_number: "1".to_string(),
            ifsc_code: "SBIN0001234".to_string(),
            pan_number: None,
            epf_uan_number: None,
            esic_number: None,
            profile_picture_url: None,
            signature_url: None,
            bank_passbook_statement_url: None,
            police_clearance_certificate_url: None,
            identity_proof_front_url: None,
            identity_proof_back_url: None,
            address_proof_front_url: None,
            address_proof_back_url: None,
            qr_code_url: None,
            created_at: format!("2024-06-01T10:00:{:02}Z", i),
            updated_at: format!("2024-06-01T10:00:{:02}Z", i),
        }
    }

    async fn seeded_db(count: usize) -> DbService {
        let db = DbService::new_memory().await.unwrap();
        let repo = db.employees();
        for i in 0..count {
            let client = if i % 2 == 0 { "ABC Industries" } else { "XY Corp" };
            repo.create(make_employee(i, client)).await.unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_cursor_pages_are_disjoint_and_ordered() {
        let db = seeded_db(25).await;
        let repo = db.employees();

        let page1 = DirectoryQuery::from_params(DirectoryParams::default())
            .fetch_page(&repo)
            .await
            .unwrap();
        assert_eq!(page1.items.len(), 10);
        assert!(page1.has_more);
        let cursor = page1.next_cursor.clone().unwrap();

        let page2 = DirectoryQuery::from_params(DirectoryParams {
            cursor: Some(cursor),
            ..Default::default()
        })
        .fetch_page(&repo)
        .await
        .unwrap();
        assert_eq!(page2.items.len(), 10);
        assert!(page2.has_more);

        // Newest first within and across pages
        let all: Vec<String> = page1
            .items
            .iter()
            .chain(page2.items.iter())
            .map(|e| e.created_at.clone())
            .collect();
        for pair in all.windows(2) {
            assert!(pair[0] > pair[1]);
        }

        // Disjoint
        let ids1: Vec<&str> = page1.items.iter().map(|e| e.employee_id.as_str()).collect();
        for e in &page2.items {
            assert!(!ids1.contains(&e.employee_id.as_str()));
        }

        // Final short page disables "next"
        let page3 = DirectoryQuery::from_params(DirectoryParams {
            cursor: page2.next_cursor.clone(),
            ..Default::default()
        })
        .fetch_page(&repo)
        .await
        .unwrap();
        assert_eq!(page3.items.len(), 5);
        assert!(!page3.has_more);
        assert!(page3.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_cursor_mode_applies_equality_filters() {
        let db = seeded_db(8).await;
        let repo = db.employees();

        let page = DirectoryQuery::from_params(DirectoryParams {
            client: Some("XY Corp".to_string()),
            ..Default::default()
        })
        .fetch_page(&repo)
        .await
        .unwrap();
        assert_eq!(page.items.len(), 4);
        assert!(page.items.iter().all(|e| e.client_name == "XY Corp"));
    }

    #[tokio::test]
    async fn test_search_matches_whole_tokens_only() {
        let db = seeded_db(3).await;
        let repo = db.employees();

        // Case-insensitive whole-token match
        let page = DirectoryQuery::from_params(DirectoryParams {
            search: Some("number1".to_string()),
            ..Default::default()
        })
        .fetch_page(&repo)
        .await
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].full_name, "Guard Number1");

        // Partial token does not match
        let page = DirectoryQuery::from_params(DirectoryParams {
            search: Some("Numb".to_string()),
            ..Default::default()
        })
        .fetch_page(&repo)
        .await
        .unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_search_mode_slices_in_memory() {
        let db = seeded_db(25).await;
        let repo = db.employees();

        // Every seeded employee shares the GUARD token
        let page1 = DirectoryQuery::from_params(DirectoryParams {
            search: Some("guard".to_string()),
            ..Default::default()
        })
        .fetch_page(&repo)
        .await
        .unwrap();
        assert_eq!(page1.items.len(), 10);
        assert!(page1.has_more);
        assert!(page1.next_cursor.is_none());

        let page3 = DirectoryQuery::from_params(DirectoryParams {
            search: Some("guard".to_string()),
            page: Some(3),
            ..Default::default()
        })
        .fetch_page(&repo)
        .await
        .unwrap();
        assert_eq!(page3.items.len(), 5);
        assert!(!page3.has_more);
    }

    #[tokio::test]
    async fn test_blank_search_falls_back_to_cursor_mode() {
        let query = DirectoryQuery::from_params(DirectoryParams {
            search: Some("   ".to_string()),
            ..Default::default()
        });
        assert!(matches!(query, DirectoryQuery::Cursor(_)));
    }

    #[test]
    fn test_slice_page_bounds() {
        let items: Vec<u32> = (0..25).collect();
        let (page, has_more) = slice_page(items.clone(), 1, 10);
        assert_eq!(page, (0..10).collect::<Vec<_>>());
        assert!(has_more);

        let (page, has_more) = slice_page(items.clone(), 3, 10);
        assert_eq!(page.len(), 5);
        assert!(!has_more);

        let (page, has_more) = slice_page(items, 4, 10);
        assert!(page.is_empty());
        assert!(!has_more);
    }

    #[test]
    fn test_slice_page_huge_page_number_saturates() {
        let items: Vec<u32> = (0..25).collect();
        let (page, has_more) = slice_page(items, usize::MAX, 10);
        assert!(page.is_empty());
        assert!(!has_more);
    }
}
