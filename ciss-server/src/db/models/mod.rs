//! Database models
//!
//! Document shapes stored in SurrealDB. Field names are camelCase on disk
//! and on the wire; Rust structs use `rename_all = "camelCase"`.

pub mod admin_user;
pub mod client;
pub mod employee;
pub mod serde_helpers;

pub use admin_user::AdminUser;
pub use client::{Client, ClientCreate, ClientUpdate};
pub use employee::{
    DocumentSlot, Employee, EmployeeStatus, EmployeeUpdate, MaritalStatus, RawEmployee,
    UpdateOutcome, build_update_document,
};
