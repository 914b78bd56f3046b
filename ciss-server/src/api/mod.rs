//! API Module
//!
//! One submodule per resource, each exposing a `router()` nested under its
//! `/api/...` prefix. Routers are merged in [`crate::core::server`].

pub mod auth;
pub mod clients;
pub mod employees;
pub mod enroll;
pub mod files;
pub mod health;
pub mod profile;
